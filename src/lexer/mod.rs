//! Lexical analysis for Cypher.
//!
//! [`Lexer`] drives the `logos` scanner in [`raw`], classifies words against
//! the active dialect's keyword table and attaches line/column positions.
//! It never stops early: every problem becomes a lexical diagnostic and
//! scanning resumes with the next character.

pub mod keywords;
pub mod raw;
pub mod token;

pub use keywords::lookup_keyword;
pub use token::{Keyword, Token, TokenKind};

use crate::ast::{LineIndex, Span};
use crate::diag::{Diag, DiagCode, DiagnosticSink};
use crate::dialect::{Dialect, DialectRules};
use logos::Logos;
use raw::{QuotedScan, RawToken};
use smol_str::SmolStr;

/// Result of lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, always ending with [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diag>,
}

/// A lexical analyzer for one source text and dialect.
pub struct Lexer<'a> {
    source: &'a str,
    rules: &'static DialectRules,
    lines: LineIndex,
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            source,
            rules: dialect.rules(),
            lines: LineIndex::new(source),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the whole source.
    pub fn tokenize(mut self) -> LexerResult {
        let source = self.source;
        let mut raw = RawToken::lexer(source);
        while let Some(result) = raw.next() {
            match result {
                Ok(token) => self.push_raw(token, raw.span()),
                Err(()) => {
                    let span = self.unrecognized_span(&mut raw);
                    let text = &source[span.clone()];
                    self.error(
                        span.clone(),
                        DiagCode::UnrecognizedCharacter,
                        format!("unrecognized character `{}`", text.escape_debug()),
                    );
                    self.push(TokenKind::Error, span);
                }
            }
        }

        let end = self.source.len();
        self.push(TokenKind::Eof, end..end);

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn push_raw(&mut self, token: RawToken, span: Span) {
        let source = self.source;
        let text = &source[span.clone()];
        let kind = match token {
            RawToken::BlockComment(scan) => {
                if !scan.terminated {
                    self.error(
                        span.start..span.start + 2,
                        DiagCode::UnterminatedComment,
                        "unterminated block comment",
                    );
                }
                return;
            }
            RawToken::Word => match lookup_keyword(text) {
                Some(keyword) if self.rules.is_keyword(keyword) => TokenKind::Keyword(keyword),
                _ => TokenKind::Identifier(SmolStr::new(text)),
            },
            RawToken::QuotedIdentifier(scan) => {
                if !scan.terminated {
                    self.error(
                        span.clone(),
                        DiagCode::UnterminatedQuotedIdentifier,
                        "unterminated quoted identifier",
                    );
                }
                TokenKind::QuotedIdentifier(SmolStr::new(scan.value))
            }
            RawToken::String(scan) => self.string_literal(scan, &span),
            RawToken::Integer => TokenKind::Integer(SmolStr::new(text)),
            RawToken::Float => TokenKind::Float(SmolStr::new(text)),
            RawToken::MalformedNumber => {
                let diag = Diag::error(format!("malformed number `{text}`"))
                    .with_primary_label(span.clone(), "exponent has no digits")
                    .with_help("write at least one digit after the exponent marker")
                    .with_code(DiagCode::MalformedNumber);
                self.diagnostics.push(diag);
                TokenKind::Float(SmolStr::new(text))
            }
            RawToken::Parameter => TokenKind::Parameter(SmolStr::new(&text[1..])),
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Eq => TokenKind::Eq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::RegexMatch => TokenKind::RegexMatch,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::DotDot => TokenKind::DotDot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Pipe => TokenKind::Pipe,
        };
        self.push(kind, span);
    }

    fn string_literal(&mut self, scan: QuotedScan, span: &Span) -> TokenKind {
        let source = self.source;
        for escape in &scan.invalid_escapes {
            let text = &source[escape.clone()];
            let diag = Diag::error(format!("invalid escape sequence `{text}`"))
                .with_primary_label(escape.clone(), "unknown escape")
                .with_help(r#"valid escapes are \t \b \n \r \f \' \" \\ \uXXXX and \UXXXXXXXX"#)
                .with_code(DiagCode::InvalidEscape);
            self.diagnostics.push(diag);
        }
        if !scan.terminated {
            let quote = &source[span.start..span.start + 1];
            let diag = Diag::error("unterminated string literal")
                .with_primary_label(span.clone(), "string starts here")
                .with_help(format!("add a closing {quote}"))
                .with_code(DiagCode::UnterminatedString);
            self.diagnostics.push(diag);
        }
        TokenKind::String(SmolStr::new(scan.value))
    }

    /// Span of an unrecognized character, widened to a full UTF-8 sequence.
    fn unrecognized_span(&self, raw: &mut logos::Lexer<'a, RawToken>) -> Span {
        let span = raw.span();
        let char_len = self
            .source
            .get(span.start..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8);
        let end = span.start + char_len;
        if span.end < end {
            raw.bump(end - span.end);
            span.start..end
        } else {
            span
        }
    }

    fn push(&mut self, kind: TokenKind, span: Span) {
        let source = self.source;
        let (line, column) = self.lines.line_col(source, span.start);
        let lexeme = &source[span.clone()];
        self.tokens.push(Token::new(kind, lexeme, span, line, column));
    }

    fn error(&mut self, span: Span, code: DiagCode, message: impl Into<String>) {
        let diag = Diag::error(message)
            .with_primary_label(span, "here")
            .with_code(code);
        self.diagnostics.push(diag);
    }
}

/// Tokenizes `source` for `dialect`, appending lexical diagnostics to `sink`.
pub fn tokenize(source: &str, dialect: Dialect, sink: &mut DiagnosticSink) -> Vec<Token> {
    let LexerResult {
        tokens,
        diagnostics,
    } = Lexer::new(source, dialect).tokenize();
    sink.extend(diagnostics);
    tokens
}
