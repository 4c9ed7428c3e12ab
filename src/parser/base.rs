//! Token stream navigation and syntax-error construction shared by all
//! parser modules.

use crate::ast::Span;
use crate::diag::{Diag, DiagCode};
use crate::lexer::{Keyword, Token, TokenKind};

/// Common error type for parsing operations.
pub type ParseError = Box<Diag>;

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Cursor over the tokens of one parse.
///
/// The stream always ends with an [`TokenKind::Eof`] token, and
/// [`TokenKind::Error`] tokens (already reported by the lexer) are dropped,
/// so the grammar never sees them.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Error)
            .collect();
        if tokens.last().is_none_or(|token| token.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |token| token.span.end);
            let (line, column) = tokens
                .last()
                .map_or((1, 1), |token| (token.line, token.column));
            tokens.push(Token::new(TokenKind::Eof, "", end..end, line, column));
        }
        Self { tokens, pos: 0 }
    }

    /// Returns the current token; past the end this is the EOF token.
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Kind of the token `n` positions ahead of the current one.
    pub fn peek_kind(&self, n: usize) -> &TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// Advances to the next token and returns the span of the consumed one.
    ///
    /// Stays on EOF once it is reached.
    pub fn advance(&mut self) -> Span {
        let span = self.current().span.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        span
    }

    pub fn is_at_end(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    /// Consumes the current token if it matches the given kind.
    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        self.consume(&TokenKind::Keyword(keyword))
    }

    /// Expects a specific token kind and returns its span.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(&format!("`{kind}`")))
        }
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Span> {
        self.expect(TokenKind::Keyword(keyword))
    }

    /// "unexpected token" error at the current position.
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        let token = self.current();
        let code = if token.kind == TokenKind::Eof {
            DiagCode::UnexpectedEndOfInput
        } else {
            DiagCode::UnexpectedToken
        };
        Box::new(
            Diag::error(message)
                .with_primary_label(token.span.clone(), "here")
                .with_code(code),
        )
    }

    /// "expected X, found Y" error at the current position.
    pub fn expected(&self, what: &str) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            return Box::new(
                Diag::error(format!("unexpected end of input, expected {what}"))
                    .with_primary_label(token.span.clone(), format!("expected {what}"))
                    .with_code(DiagCode::UnexpectedEndOfInput),
            );
        }
        Box::new(
            Diag::error(format!("expected {what}, found {}", token.kind))
                .with_primary_label(token.span.clone(), format!("expected {what}"))
                .with_code(DiagCode::ExpectedToken),
        )
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Sets the position in the token stream (used for backtracking).
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len() - 1);
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.clone()
        } else {
            self.current().span.start..self.current().span.start
        }
    }

    /// Kind of the most recently consumed token, if any.
    pub fn previous_kind(&self) -> Option<&TokenKind> {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| &token.kind)
    }

    /// Span from `start` to the end of the most recently consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        start..self.previous_span().end.max(start)
    }
}
