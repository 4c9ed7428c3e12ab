//! Parser for Cypher documents.
//!
//! The parser consumes the lexer's tokens and builds a [`Document`]. Grammar
//! rules live in `impl Parser` blocks spread over the submodules:
//! statements and UNION in `statement`, the per-clause sub-parsers in
//! `clause`, graph patterns in `pattern` and the Pratt expression parser in
//! `expression`. Every rule returns [`ParseResult`] and propagates syntax
//! errors with `?`.
//!
//! What happens to an error depends on the mode. In abort mode it bubbles up
//! to [`Parser::parse_document`], which records it and yields no document.
//! In recovery mode the clause loop records it, skips to a synchronization
//! point (see `recovery`) and inserts a
//! [`Clause::Error`](crate::ast::Clause::Error) placeholder.

pub mod base;
mod clause;
mod expression;
mod pattern;
mod recovery;
mod statement;

pub use base::{ParseError, ParseResult, TokenStream};

use crate::ast::Document;
use crate::diag::{Diag, DiagCode, DiagnosticSink};
use crate::dialect::DialectRules;
use crate::lexer::Token;
use crate::options::CypherParseOptions;
use crate::semantic::ScopeTracker;

/// Recursive-descent parser for one token stream.
///
/// Owns its token stream and scope tracker; diagnostics go to the sink
/// borrowed from the caller.
pub struct Parser<'sink> {
    stream: TokenStream,
    sink: &'sink mut DiagnosticSink,
    rules: &'static DialectRules,
    recover: bool,
    max_depth: usize,
    depth: usize,
    scopes: ScopeTracker,
}

impl<'sink> Parser<'sink> {
    pub fn new(
        tokens: Vec<Token>,
        options: &CypherParseOptions,
        sink: &'sink mut DiagnosticSink,
    ) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            sink,
            rules: options.dialect.rules(),
            recover: options.recover_errors,
            max_depth: options.max_nesting_depth,
            depth: 0,
            scopes: ScopeTracker::new(),
        }
    }

    /// Parses the whole token stream.
    ///
    /// Returns `None` only in abort mode, after the first syntax error has
    /// been recorded in the sink.
    pub fn parse_document(&mut self) -> Option<Document> {
        match self.document() {
            Ok(document) => {
                tracing::debug!(
                    statements = document.statements.len(),
                    "parsed document"
                );
                Some(document)
            }
            Err(diag) => {
                tracing::debug!(code = ?diag.code, "parse aborted");
                self.sink.push(*diag);
                None
            }
        }
    }

    /// Hands the scope tracker over to the validator.
    ///
    /// Every frame the parser pushed has been popped again, so the tracker
    /// is empty but keeps its allocation.
    pub fn into_scopes(self) -> ScopeTracker {
        self.scopes
    }

    /// Records `diag` in recovery mode, or fails with it in abort mode.
    ///
    /// For errors detected outside the clause loop that need no token
    /// skipping.
    fn report(&mut self, diag: ParseError) -> ParseResult<()> {
        if self.recover {
            self.sink.push(*diag);
            Ok(())
        } else {
            Err(diag)
        }
    }

    /// Runs `rule` one nesting level deeper, failing with CYP202 when the
    /// configured limit is reached.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            let span = self.stream.current().span.clone();
            return Err(Box::new(
                Diag::error(format!(
                    "nesting exceeds the maximum depth of {}",
                    self.max_depth
                ))
                .with_primary_label(span, "nested too deeply")
                .with_help("split the query or raise `max_nesting_depth`")
                .with_code(DiagCode::NestingTooDeep),
            ));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// CYP200 error for grammar the active dialect lacks.
    fn unsupported(&self, feature: &str) -> ParseError {
        let span = self.stream.current().span.clone();
        Box::new(
            Diag::error(format!(
                "{feature} are not supported by the {} dialect",
                self.rules.dialect
            ))
            .with_primary_label(span, "unsupported here")
            .with_help("select the neo4j5 dialect to use subqueries")
            .with_code(DiagCode::UnsupportedInDialect),
        )
    }
}

/// Parses `tokens` into a document, recording syntax errors in `sink`.
pub fn parse_tokens(
    tokens: Vec<Token>,
    options: &CypherParseOptions,
    sink: &mut DiagnosticSink,
) -> Option<Document> {
    Parser::new(tokens, options, sink).parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Clause, Statement};
    use crate::dialect::Dialect;
    use crate::lexer::Lexer;

    fn run(source: &str, options: &CypherParseOptions) -> (Option<Document>, DiagnosticSink) {
        let tokens = Lexer::new(source, options.dialect).tokenize().tokens;
        let mut sink = DiagnosticSink::new();
        let document = parse_tokens(tokens, options, &mut sink);
        (document, sink)
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let (document, sink) = run("", &CypherParseOptions::default());
        let document = document.unwrap();
        assert!(document.statements.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn abort_mode_returns_no_document() {
        let (document, sink) = run("MATCH (n RETURN n", &CypherParseOptions::default());
        assert!(document.is_none());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.as_slice()[0].code, Some(DiagCode::ExpectedToken));
    }

    #[test]
    fn recovery_mode_inserts_error_clause() {
        let options = CypherParseOptions::default().with_recover_errors(true);
        let (document, sink) = run("MATCH (n RETURN n", &options);
        let document = document.unwrap();
        let query = document.statements[0].as_query().unwrap();
        assert!(matches!(query.clauses[0], Clause::Error(_)));
        assert!(matches!(query.clauses[1], Clause::Return(_)));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let options = CypherParseOptions::default().with_max_nesting_depth(8);
        let source = format!("RETURN {}1{}", "(".repeat(20), ")".repeat(20));
        let (document, sink) = run(&source, &options);
        assert!(document.is_none());
        assert_eq!(sink.count_code(DiagCode::NestingTooDeep), 1);

        let (document, sink) = run(&source, &CypherParseOptions::default());
        assert!(document.is_some());
        assert!(sink.is_empty());
    }

    #[test]
    fn scopes_are_balanced_after_parsing() {
        let options = CypherParseOptions::default()
            .with_dialect(Dialect::Neo4j5)
            .with_recover_errors(true);
        let tokens = Lexer::new("CALL { MATCH (n RETURN n } RETURN 1", Dialect::Neo4j5)
            .tokenize()
            .tokens;
        let mut sink = DiagnosticSink::new();
        let mut parser = Parser::new(tokens, &options, &mut sink);
        let document = parser.parse_document().unwrap();
        assert_eq!(parser.into_scopes().depth(), 0);
        assert!(matches!(document.statements[0], Statement::Query(_)));
        assert_eq!(sink.len(), 1);
    }
}
