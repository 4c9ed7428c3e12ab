//! Panic-mode error recovery.
//!
//! After a syntax error the clause loop skips tokens until it reaches a
//! synchronization point and resumes there. Synchronization points are
//! clause keywords, `UNION`, `;` and end of input, plus the `}` closing the
//! current subquery. Brackets opened while skipping are skipped as a whole,
//! so a clause keyword inside them or inside a nested subquery does not end
//! the skip early.

use crate::ast::{ErrorNode, Span};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::Parser;

/// Keywords that begin a clause.
const CLAUSE_START_KEYWORDS: &[Keyword] = &[
    Keyword::Match,
    Keyword::Optional,
    Keyword::Where,
    Keyword::With,
    Keyword::Return,
    Keyword::Unwind,
    Keyword::Create,
    Keyword::Merge,
    Keyword::Delete,
    Keyword::Detach,
    Keyword::Set,
    Keyword::Remove,
    Keyword::Call,
];

pub(crate) fn is_clause_start(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(keyword) if CLAUSE_START_KEYWORDS.contains(keyword))
}

impl Parser<'_> {
    /// True when the current token can begin a clause.
    pub(crate) fn at_clause_start(&self) -> bool {
        is_clause_start(self.stream.current_kind())
    }

    /// True when the current token ends the clause sequence being parsed.
    pub(crate) fn at_sequence_end(&self) -> bool {
        match self.stream.current_kind() {
            TokenKind::Eof | TokenKind::Semicolon => true,
            TokenKind::Keyword(Keyword::Union) => true,
            TokenKind::RBrace => self.scopes.is_nested(),
            _ => false,
        }
    }

    /// Skips to the next synchronization point after a failed clause and
    /// returns the placeholder covering the skipped source.
    ///
    /// `start` is the byte offset where the failed clause began and
    /// `start_pos` its token position. At least one token is consumed when
    /// the failed clause consumed none, so the clause loop always advances.
    pub(crate) fn recover_clause(&mut self, start: usize, start_pos: usize) -> ErrorNode {
        let from = self.stream.position();
        if from == start_pos && !self.at_sequence_end() {
            self.stream.advance();
        }
        self.synchronize();
        let span: Span = self.stream.span_from(start);
        tracing::trace!(
            from,
            to = self.stream.position(),
            ?span,
            "synchronized after syntax error"
        );
        ErrorNode { span }
    }

    fn synchronize(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.stream.current_kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    if depth == 0 {
                        if self.scopes.is_nested() {
                            return;
                        }
                    } else {
                        depth -= 1;
                    }
                }
                TokenKind::Keyword(Keyword::Union) if depth == 0 => return,
                kind if depth == 0 && is_clause_start(kind) && !self.after_on() => return,
                _ => {}
            }
            self.stream.advance();
        }
    }

    /// `ON CREATE` and `ON MATCH` belong to MERGE and do not start a clause.
    fn after_on(&self) -> bool {
        matches!(
            self.stream.previous_kind(),
            Some(TokenKind::Keyword(Keyword::On))
        )
    }
}
