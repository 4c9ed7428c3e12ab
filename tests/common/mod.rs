//! Common test utilities
//!
//! Shared helpers for the integration tests.
//!
//! # Parsing Helpers
//! - [`parse_with`] - Parse with a dialect and recovery setting
//! - [`parse_cleanly`] - Parse and return the document, panicking on any diagnostic
//!
//! # Diagnostic Helpers
//! - [`format_diagnostics`] - Format diagnostics for assertion messages
//! - [`codes`] - The stable codes of a result's diagnostics, in order
//! - [`count_code`] - How many diagnostics carry a code
//!
//! # Tree Helpers
//! - [`span_violations`] - Nodes whose span escapes their parent's span

#![allow(dead_code)]

use cypher_parser::ast::visit::{
    Visit, VisitResult, walk_clause, walk_expression, walk_node_pattern, walk_pattern_part,
    walk_query, walk_relationship_pattern, walk_statement,
};
use cypher_parser::ast::{
    Clause, Document, Expression, NodePattern, PatternPart, Query, RelationshipPattern, Span,
    Statement, span_contains,
};
use cypher_parser::{CypherParseOptions, Diag, DiagCode, Dialect, ParseResult, parse};

/// Parses `source` with the given dialect and recovery mode.
pub fn parse_with(source: &str, dialect: Dialect, recover: bool) -> ParseResult {
    let options = CypherParseOptions::default()
        .with_dialect(dialect)
        .with_recover_errors(recover);
    parse(source, &options)
}

/// Format diagnostics for display in assertion messages.
pub fn format_diagnostics(diags: &[Diag]) -> String {
    diags
        .iter()
        .map(|diag| {
            format!(
                "{} {:?} {}",
                diag.code_str().unwrap_or("-"),
                diag.span(),
                diag.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that a parse result carries no diagnostics at all.
pub fn assert_no_diagnostics(result: &ParseResult, source: &str) {
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`:\n{}",
        format_diagnostics(&result.diagnostics)
    );
}

/// Parse source and return the document, panicking on any diagnostic.
pub fn parse_cleanly(source: &str, dialect: Dialect) -> Document {
    let result = parse_with(source, dialect, false);
    assert_no_diagnostics(&result, source);
    result
        .document
        .unwrap_or_else(|| panic!("expected a document for `{source}`"))
}

pub fn codes(result: &ParseResult) -> Vec<&'static str> {
    result
        .diagnostics
        .iter()
        .filter_map(Diag::code_str)
        .collect()
}

pub fn count_code(result: &ParseResult, code: DiagCode) -> usize {
    result.diagnostics_with_code(code).count()
}

// ============================================================================
// Span Containment
// ============================================================================

/// Collects every node whose span escapes its parent's span.
pub fn span_violations(document: &Document) -> Vec<String> {
    let mut checker = SpanContainment {
        parents: vec![document.span.clone()],
        violations: Vec::new(),
    };
    let _ = checker.visit_document(document);
    checker.violations
}

struct SpanContainment {
    parents: Vec<Span>,
    violations: Vec<String>,
}

impl SpanContainment {
    fn enter(&mut self, what: &str, span: Span) {
        if let Some(parent) = self.parents.last() {
            if !span_contains(parent, &span) {
                self.violations
                    .push(format!("{what} {span:?} outside parent {parent:?}"));
            }
        }
        self.parents.push(span);
    }

    fn leave(&mut self) -> VisitResult<()> {
        self.parents.pop();
        VisitResult::Continue(())
    }
}

impl Visit for SpanContainment {
    type Break = ();

    fn visit_statement(&mut self, statement: &Statement) -> VisitResult<()> {
        self.enter("statement", statement.span());
        walk_statement(self, statement)?;
        self.leave()
    }

    fn visit_subquery(&mut self, body: &Query) -> VisitResult<()> {
        self.enter("subquery", body.span.clone());
        walk_query(self, body)?;
        self.leave()
    }

    fn visit_clause(&mut self, clause: &Clause) -> VisitResult<()> {
        self.enter("clause", clause.span());
        walk_clause(self, clause)?;
        self.leave()
    }

    fn visit_pattern_part(&mut self, part: &PatternPart) -> VisitResult<()> {
        self.enter("pattern part", part.span.clone());
        walk_pattern_part(self, part)?;
        self.leave()
    }

    fn visit_node_pattern(&mut self, node: &NodePattern) -> VisitResult<()> {
        self.enter("node", node.span.clone());
        walk_node_pattern(self, node)?;
        self.leave()
    }

    fn visit_relationship_pattern(&mut self, rel: &RelationshipPattern) -> VisitResult<()> {
        self.enter("relationship", rel.span.clone());
        walk_relationship_pattern(self, rel)?;
        self.leave()
    }

    fn visit_expression(&mut self, expression: &Expression) -> VisitResult<()> {
        self.enter("expression", expression.span());
        walk_expression(self, expression)?;
        self.leave()
    }
}
