//! End-to-end behavior of `parse`: failure modes, semantic checks and the
//! structural guarantees of the returned tree.

mod common;

use common::{
    assert_no_diagnostics, codes, count_code, format_diagnostics, parse_with, span_violations,
};
use cypher_parser::ast::{Clause, MergeActionKind, Span, Statement};
use cypher_parser::{DiagCode, DiagFamily, Dialect};
use pretty_assertions::assert_eq;

const SYNTAX_ERRORS: &[&str] = &[
    "MATCH (n RETURN n",
    "MATCH (n) RETURN",
    "RETURN 1 +",
    "MATCH (n)-[r->(m) RETURN n",
    "WITH [1, 2 RETURN 1",
    "UNWIND [1] x RETURN x",
    "hello",
];

#[test]
fn abort_mode_returns_no_document_on_syntax_error() {
    for source in SYNTAX_ERRORS {
        let result = parse_with(source, Dialect::OpenCypher, false);
        assert!(result.has_errors, "{source}");
        assert!(result.document.is_none(), "{source}");
        assert!(
            result.diagnostics.iter().any(|d| matches!(
                d.code.map(|c| c.family()),
                Some(DiagFamily::Syntax | DiagFamily::Lexical)
            )),
            "{source}: {}",
            format_diagnostics(&result.diagnostics)
        );
    }
}

#[test]
fn recovery_mode_always_returns_a_document() {
    for source in SYNTAX_ERRORS {
        let result = parse_with(source, Dialect::OpenCypher, true);
        assert!(result.has_errors, "{source}");
        assert!(result.document.is_some(), "{source}");
    }
}

#[test]
fn abort_mode_reports_only_the_first_syntax_error() {
    let result = parse_with("MATCH (n RETURN n; MATCH (m RETURN m", Dialect::OpenCypher, false);
    assert_eq!(codes(&result), ["CYP101"]);
    assert_eq!(result.diagnostics[0].span(), 9..15);

    let result = parse_with("MATCH (n RETURN n; MATCH (m RETURN m", Dialect::OpenCypher, true);
    assert_eq!(codes(&result), ["CYP101", "CYP101"]);
    let document = result.document.unwrap();
    assert_eq!(document.statements.len(), 2);
}

#[test]
fn cross_clause_rebinding_is_shadowing() {
    let result = parse_with("WITH 1 AS x WITH x + 1 AS x RETURN x", Dialect::OpenCypher, false);
    assert_no_diagnostics(&result, "WITH 1 AS x WITH x + 1 AS x RETURN x");
    assert_eq!(count_code(&result, DiagCode::AliasConflict), 0);
}

#[test]
fn duplicate_alias_in_one_clause() {
    let result = parse_with("RETURN 1 AS a, 2 AS a", Dialect::OpenCypher, false);
    assert!(result.has_errors);
    assert!(result.document.is_some());
    assert_eq!(count_code(&result, DiagCode::AliasConflict), 1);
}

#[test]
fn merge_actions_are_not_clauses() {
    let source = "MERGE (n) ON CREATE SET n.created = 1 ON MATCH SET n.seen = n.seen + 1 RETURN n";
    let result = parse_with(source, Dialect::OpenCypher, false);
    assert!(!result.has_errors, "{}", format_diagnostics(&result.diagnostics));

    let document = result.document.unwrap();
    let query = document.statements[0].as_query().unwrap();
    assert_eq!(query.clauses.len(), 2);
    let Clause::Merge(merge) = &query.clauses[0] else {
        panic!("expected MERGE, got {:?}", query.clauses[0]);
    };
    let kinds: Vec<MergeActionKind> = merge.actions.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, [MergeActionKind::OnCreate, MergeActionKind::OnMatch]);
}

#[test]
fn subquery_clauses_do_not_affect_outer_ordering() {
    let source = "MATCH (n) WHERE exists { MATCH (n)-->(m) WHERE n.prop = m.prop RETURN m } RETURN n";
    let result = parse_with(source, Dialect::Neo4j5, false);
    assert_no_diagnostics(&result, source);
    assert_eq!(count_code(&result, DiagCode::ClauseOrder), 0);

    let source = "MATCH (n) CALL { WITH n MATCH (n)-->(m) RETURN m } RETURN n, m";
    let result = parse_with(source, Dialect::Neo4j5, false);
    assert_no_diagnostics(&result, source);
}

#[test]
fn ordering_violation_is_reported_once_per_clause() {
    let result = parse_with("RETURN 1 WHERE true MATCH (n)", Dialect::OpenCypher, false);
    assert_eq!(count_code(&result, DiagCode::ClauseOrder), 2);
    let spans: Vec<Span> = result.diagnostics.iter().map(|d| d.span()).collect();
    assert_eq!(spans, [9..19, 20..29]);
}

#[test]
fn diagnostics_are_deterministic() {
    let sources = [
        "MATCH (n RETURN n WITH 1 AS a, 2 AS a RETURN a",
        "CALL { MATCH (n WITH n RETURN n } RETURN 1 UNION ALL RETURN 2",
        "RETURN 'unterminated",
    ];
    for source in sources {
        for dialect in [Dialect::OpenCypher, Dialect::Neo4j5] {
            let first = parse_with(source, dialect, true);
            let second = parse_with(source, dialect, true);
            assert_eq!(first, second, "{source}");
        }
    }
}

#[test]
fn every_node_span_lies_within_its_parent() {
    let sources = [
        "MATCH p = (a:Person {name: 'x'})-[r:KNOWS*1..3]->(b) WHERE a.age > 3 AND b.name STARTS WITH 'B' RETURN p, r",
        "UNWIND [1, 2, 3] AS x WITH x * 2 AS y ORDER BY y DESC SKIP 1 LIMIT 2 RETURN y",
        "MATCH (n) WHERE exists { MATCH (n)-->(m) WHERE m.x IS NOT NULL RETURN m } RETURN n",
        "MERGE (n:A {id: $id}) ON CREATE SET n += {a: 1}, n:B RETURN n",
        "CALL { MATCH (n) RETURN count(*) AS c } RETURN c",
        "RETURN [x IN range(1, 10) WHERE x % 2 = 0 | x ^ 2] AS xs, CASE WHEN true THEN 1 ELSE 2 END AS c",
        "MATCH (n) SET n.x = -1 REMOVE n:Old, n.y DETACH DELETE n",
        "RETURN 1 AS x UNION RETURN 2 AS x",
    ];
    for source in sources {
        let result = parse_with(source, Dialect::Neo4j5, true);
        let document = result.document.unwrap();
        let violations = span_violations(&document);
        assert!(violations.is_empty(), "{source}: {violations:#?}");
    }
}

#[test]
fn recovered_tree_keeps_spans_nested() {
    let source = "MATCH (n:) WHERE n.x > 1 RETURN n; hello; CALL { MATCH (n RETURN n } RETURN 1";
    let result = parse_with(source, Dialect::Neo4j5, true);
    let document = result.document.unwrap();
    assert_eq!(document.statements.len(), 3);
    assert!(matches!(document.statements[1], Statement::Error(_)));
    assert!(span_violations(&document).is_empty());
}

#[test]
fn pattern_predicates_are_valid_expressions() {
    let sources = [
        "MATCH (n) WHERE (n)-[:KNOWS]->() RETURN n",
        "MATCH (n) WHERE NOT (n)-->(:X) RETURN n",
        "MATCH (n) WHERE exists((n)-->()) RETURN n",
        "MATCH (a), (b) WHERE (a)<-[:R*1..2]-(b) AND a.x > 1 RETURN a",
        "MATCH (n) RETURN (n)--() AS linked",
    ];
    for source in sources {
        for dialect in [Dialect::OpenCypher, Dialect::Neo4j5] {
            let result = parse_with(source, dialect, false);
            assert_no_diagnostics(&result, source);
            let document = result.document.as_ref().unwrap();
            let violations = span_violations(document);
            assert!(violations.is_empty(), "{source}: {violations:#?}");
        }
    }
}

#[test]
fn standalone_procedure_calls_are_complete_queries() {
    for source in ["CALL db.labels()", "CALL db.labels() YIELD label"] {
        for dialect in [Dialect::OpenCypher, Dialect::Neo4j5] {
            let result = parse_with(source, dialect, false);
            assert!(!result.has_errors, "{source}");
            assert_no_diagnostics(&result, source);
        }
    }
}

#[test]
fn where_cannot_filter_a_call_without_yield() {
    let source = "CALL { RETURN 1 AS x } WHERE x > 0 RETURN x";
    let result = parse_with(source, Dialect::Neo4j5, false);
    assert_eq!(codes(&result), ["CYP300"]);
    assert_eq!(result.diagnostics[0].span(), 23..34);

    let result = parse_with("CALL db.labels() WHERE true RETURN 1", Dialect::OpenCypher, false);
    assert_eq!(codes(&result), ["CYP300"]);
}
