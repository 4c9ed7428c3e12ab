mod common;

use common::{codes, count_code, format_diagnostics, parse_with};
use cypher_parser::ast::{Clause, ClauseKind, Statement};
use cypher_parser::{CypherParseOptions, DiagCode, Dialect, parse};
use pretty_assertions::assert_eq;

fn clause_kinds(statement: &Statement) -> Vec<ClauseKind> {
    statement
        .as_query()
        .map(|query| query.clauses.iter().map(Clause::kind).collect())
        .unwrap_or_default()
}

#[test]
fn failed_clause_is_replaced_in_place() {
    let result = parse_with("MATCH (n) WITH n, RETURN n", Dialect::OpenCypher, true);
    let document = result.document.as_ref().unwrap();
    assert_eq!(
        clause_kinds(&document.statements[0]),
        [ClauseKind::Match, ClauseKind::Error, ClauseKind::Return]
    );
    assert_eq!(codes(&result), ["CYP101"], "{}", format_diagnostics(&result.diagnostics));
}

#[test]
fn every_clause_may_fail() {
    let result = parse_with("MATCH ( WITH [ RETURN {", Dialect::OpenCypher, true);
    let document = result.document.unwrap();
    let kinds = clause_kinds(&document.statements[0]);
    assert_eq!(kinds, [ClauseKind::Error; 3]);
    assert_eq!(result.diagnostics.len(), 3);
}

#[test]
fn lexical_errors_never_abort() {
    let result = parse_with("RETURN 'abc", Dialect::OpenCypher, false);
    assert!(result.has_errors);
    assert!(result.document.is_some());
    assert_eq!(codes(&result), ["CYP002"]);
}

#[test]
fn semantic_checks_run_on_recovered_documents() {
    let result = parse_with(
        "MATCH (n RETURN n; RETURN 1 AS a, 2 AS a",
        Dialect::OpenCypher,
        true,
    );
    assert_eq!(codes(&result), ["CYP101", "CYP301"]);
}

#[test]
fn nesting_limit_is_a_syntax_error() {
    let source = format!("RETURN {}1{}", "(".repeat(40), ")".repeat(40));
    let options = CypherParseOptions::default().with_max_nesting_depth(16);
    let result = parse(&source, &options);
    assert!(result.document.is_none());
    assert_eq!(count_code(&result, DiagCode::NestingTooDeep), 1);

    let result = parse(&source, &options.clone().with_recover_errors(true));
    let document = result.document.unwrap();
    assert_eq!(clause_kinds(&document.statements[0]), [ClauseKind::Error]);

    let result = parse(&source, &CypherParseOptions::default());
    assert!(!result.has_errors);
}

#[test]
fn deeply_nested_subqueries_hit_the_limit() {
    let depth = 10;
    let source = format!(
        "{}RETURN 1{}",
        "CALL { ".repeat(depth),
        " } RETURN 1".repeat(depth)
    );
    let options = CypherParseOptions::default()
        .with_dialect(Dialect::Neo4j5)
        .with_max_nesting_depth(4);
    let result = parse(&source, &options);
    assert_eq!(count_code(&result, DiagCode::NestingTooDeep), 1);

    let options = options.with_max_nesting_depth(64);
    let result = parse(&source, &options);
    assert!(result.diagnostics.is_empty(), "{}", format_diagnostics(&result.diagnostics));
}

#[test]
fn recovery_resumes_after_semicolon() {
    let result = parse_with("MATCH (n) RETURN ) ; MATCH (m) RETURN m", Dialect::OpenCypher, true);
    let document = result.document.as_ref().unwrap();
    assert_eq!(document.statements.len(), 2);
    assert_eq!(
        clause_kinds(&document.statements[0]),
        [ClauseKind::Match, ClauseKind::Error]
    );
    assert_eq!(
        clause_kinds(&document.statements[1]),
        [ClauseKind::Match, ClauseKind::Return]
    );
    // The first statement now ends in MATCH.
    assert_eq!(codes(&result), ["CYP101", "CYP300"]);
}
