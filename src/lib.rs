//! Cypher parser with rich diagnostics.
//!
//! [`parse`] runs the whole front-end pipeline on one source text: the lexer,
//! the recursive-descent parser and the semantic validator, all configured
//! by [`CypherParseOptions`]. Every problem found along the way becomes a
//! [`Diag`] with a stable code (`CYP0xx` lexical, `CYP1xx`/`CYP2xx` syntax,
//! `CYP3xx` semantic) rendered through miette.
//!
//! # Example
//!
//! ```
//! use cypher_parser::{CypherParseOptions, DiagCode, parse};
//!
//! let result = parse("MATCH (n:Person) WHERE n.age > 18 RETURN n", &CypherParseOptions::default());
//! assert!(!result.has_errors);
//! assert_eq!(result.document.unwrap().statements.len(), 1);
//!
//! // Recovery mode keeps going after syntax errors.
//! let options = CypherParseOptions::default().with_recover_errors(true);
//! let result = parse("MATCH (n RETURN n", &options);
//! assert!(result.has_errors);
//! assert!(result.document.is_some());
//! assert_eq!(result.diagnostics[0].code, Some(DiagCode::ExpectedToken));
//! ```

pub mod ast;
pub mod diag;
pub mod dialect;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod semantic;

use miette::Report;

pub use ast::{Document, Span, Spanned};
pub use diag::{
    Diag, DiagCode, DiagFamily, DiagLabel, DiagSeverity, DiagnosticSink, LabelRole, SourceFile,
};
pub use dialect::{Dialect, DialectParseError};
pub use lexer::{Lexer, LexerResult, Token, TokenKind, tokenize};
pub use options::CypherParseOptions;

use parser::Parser;

/// Outcome of one [`parse`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// `None` only when abort mode stopped at a syntax error.
    pub document: Option<Document>,
    /// Lexical, syntax and semantic diagnostics in emission order.
    pub diagnostics: Vec<Diag>,
    /// True iff any diagnostic has error severity.
    pub has_errors: bool,
}

impl ParseResult {
    /// Renders every diagnostic as a miette report over `source`.
    pub fn reports(&self, source: &str) -> Vec<Report> {
        diag::convert_diagnostics_to_reports(&self.diagnostics, &SourceFile::new(source))
    }

    /// Diagnostics with the given code.
    pub fn diagnostics_with_code(&self, code: DiagCode) -> impl Iterator<Item = &Diag> {
        self.diagnostics
            .iter()
            .filter(move |diag| diag.code == Some(code))
    }
}

/// Parses `source` into a [`Document`] and collects its diagnostics.
///
/// Never panics and never fails for any text input; every problem is a
/// diagnostic in the result. Calls share no state, so any number may run
/// concurrently.
pub fn parse(source: &str, options: &CypherParseOptions) -> ParseResult {
    let mut sink = DiagnosticSink::new();

    let tokens = tokenize(source, options.dialect, &mut sink);
    tracing::debug!(
        tokens = tokens.len(),
        lexical_errors = sink.len(),
        dialect = %options.dialect,
        "lexed source"
    );

    let mut parser = Parser::new(tokens, options, &mut sink);
    let document = parser.parse_document();
    let mut scopes = parser.into_scopes();

    if let Some(document) = &document {
        semantic::validate(document, options.dialect, &mut scopes, &mut sink);
    }

    let has_errors = sink.has_errors();
    tracing::debug!(
        diagnostics = sink.len(),
        has_errors,
        recovered = options.recover_errors,
        "parse finished"
    );
    ParseResult {
        document,
        diagnostics: sink.into_vec(),
        has_errors,
    }
}
