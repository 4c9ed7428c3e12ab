//! Clause ordering (CYP300).
//!
//! Every clause sequence is run through the dialect's ordering table in its
//! own scope frame. An illegal clause is reported and leaves the state as it
//! was; error placeholders are skipped entirely. Statement frames must also
//! finish in a terminal state, subquery frames need not. A procedure call
//! standing alone is a complete statement in every dialect.

use crate::ast::{Clause, ClauseKind, Document, Query, Statement};
use crate::diag::{Diag, DiagCode, DiagnosticSink};
use crate::dialect::{DialectRules, OrderState};
use crate::semantic::{ScopeFrame, ScopeKind, ScopeTracker};

use super::for_each_subquery;

pub(super) fn run_clause_order(
    validator: &super::SemanticValidator,
    document: &Document,
    scopes: &mut ScopeTracker,
    sink: &mut DiagnosticSink,
) {
    for statement in &document.statements {
        if let Statement::Query(query) = statement {
            check_query(validator.rules, query, ScopeKind::Statement, scopes, sink);
        }
    }
}

fn check_query(
    rules: &DialectRules,
    query: &Query,
    kind: ScopeKind,
    scopes: &mut ScopeTracker,
    sink: &mut DiagnosticSink,
) {
    for clauses in query.branches() {
        scopes.push(kind);
        let last_flagged = check_sequence(rules, clauses, scopes, sink);
        let standalone = query.unions.is_empty() && is_standalone_call(clauses);
        if kind == ScopeKind::Statement && !last_flagged && !standalone {
            check_terminal(rules, clauses, scopes, sink);
        }
        scopes.pop();
    }
}

/// Returns true when the last non-error clause was itself reported.
fn check_sequence(
    rules: &DialectRules,
    clauses: &[Clause],
    scopes: &mut ScopeTracker,
    sink: &mut DiagnosticSink,
) -> bool {
    let mut last_flagged = false;
    for clause in clauses {
        let kind = clause.kind();
        scopes.record_clause(kind);
        if kind != ClauseKind::Error {
            let state = current_state(scopes);
            match rules.ordering.after(state, clause) {
                Some(next) => {
                    scopes.set_ordering(next);
                    last_flagged = false;
                }
                None => {
                    sink.push(misplaced(clause, state));
                    last_flagged = true;
                }
            }
        }
        for_each_subquery(clause, |body| {
            check_query(rules, body, ScopeKind::Subquery, scopes, sink);
        });
    }
    last_flagged
}

/// `CALL proc() [YIELD ... [WHERE ...]]` with nothing else around it.
fn is_standalone_call(clauses: &[Clause]) -> bool {
    let mut rest = clauses
        .iter()
        .filter(|clause| !matches!(clause, Clause::Error(_)));
    let Some(Clause::Call(call)) = rest.next() else {
        return false;
    };
    if call.procedure().is_none() {
        return false;
    }
    match rest.next() {
        None => true,
        Some(Clause::Where(_)) => call.yields() && rest.next().is_none(),
        Some(_) => false,
    }
}

fn check_terminal(
    rules: &DialectRules,
    clauses: &[Clause],
    scopes: &ScopeTracker,
    sink: &mut DiagnosticSink,
) {
    let Some(last) = clauses
        .iter()
        .rev()
        .find(|clause| !matches!(clause, Clause::Error(_)))
    else {
        return;
    };
    if rules.ordering.is_terminal(current_state(scopes)) {
        return;
    }
    sink.push(
        Diag::error(format!("query cannot conclude with {}", last.kind()))
            .with_primary_label(last.span(), "last clause of the query")
            .with_help("end the query with RETURN or an updating clause")
            .with_code(DiagCode::ClauseOrder),
    );
}

fn current_state(scopes: &ScopeTracker) -> OrderState {
    scopes
        .current_frame()
        .map_or(OrderState::Start, ScopeFrame::ordering)
}

fn misplaced(clause: &Clause, state: OrderState) -> Diag {
    let kind = clause.kind();
    let message = match state {
        OrderState::Start => format!("{kind} cannot start a query"),
        _ => format!("{kind} cannot follow {}", describe(state)),
    };
    let diag = Diag::error(message)
        .with_primary_label(clause.span(), "misplaced clause")
        .with_code(DiagCode::ClauseOrder);
    match (state, kind) {
        (OrderState::Returned, kind) if kind.is_updating() => {
            diag.with_help("move the update before RETURN, or add a WITH in place of RETURN")
        }
        (OrderState::Returned, _) => diag.with_help("RETURN must be the last clause of a query"),
        (OrderState::Updating, ClauseKind::Match | ClauseKind::Unwind | ClauseKind::Call) => {
            diag.with_help("add a WITH between updating and reading clauses")
        }
        (OrderState::Called, ClauseKind::Where) => {
            diag.with_help("only a procedure call with YIELD may be filtered by WHERE")
        }
        (_, ClauseKind::Where) => {
            diag.with_help("WHERE must directly follow MATCH, WITH or CALL ... YIELD")
        }
        _ => diag,
    }
}

fn describe(state: OrderState) -> &'static str {
    match state {
        OrderState::Start => "the start of a query",
        OrderState::Reading => "UNWIND",
        OrderState::Matched => "MATCH",
        OrderState::Called => "CALL",
        OrderState::Yielded => "YIELD",
        OrderState::Projected => "WITH",
        OrderState::Filtered => "WHERE",
        OrderState::Updating => "an updating clause",
        OrderState::Returned => "RETURN",
    }
}

#[cfg(test)]
mod tests {
    use crate::diag::{Diag, DiagCode};
    use crate::{CypherParseOptions, Dialect, parse};

    fn order_errors(source: &str, dialect: Dialect) -> Vec<Diag> {
        let options = CypherParseOptions::default()
            .with_dialect(dialect)
            .with_recover_errors(true);
        parse(source, &options)
            .diagnostics
            .into_iter()
            .filter(|d| d.code == Some(DiagCode::ClauseOrder))
            .collect()
    }

    #[test]
    fn accepts_common_shapes() {
        for source in [
            "MATCH (n) RETURN n",
            "MATCH (n) WHERE n.x = 1 WITH n WHERE n.y = 2 RETURN n",
            "OPTIONAL MATCH (n) MATCH (m) RETURN n, m",
            "UNWIND [1, 2] AS x MATCH (n) WHERE n.x = x RETURN n",
            "CREATE (n) SET n.x = 1 REMOVE n:Old",
            "MATCH (n) DETACH DELETE n",
            "MERGE (n:A) WITH n MATCH (m) RETURN n, m",
            "CALL db.labels() YIELD label WHERE label <> 'x' RETURN label",
            "RETURN 1",
        ] {
            assert!(order_errors(source, Dialect::OpenCypher).is_empty(), "{source}");
        }
    }

    #[test]
    fn nothing_may_follow_return() {
        let errors = order_errors("MATCH (n) RETURN n MATCH (m) RETURN m", Dialect::OpenCypher);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].span(), 19..28);
        assert!(errors[0].message.contains("MATCH cannot follow RETURN"));
    }

    #[test]
    fn where_needs_a_reading_clause() {
        let errors = order_errors("WHERE 1 = 1 RETURN 1", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "WHERE cannot start a query");

        let errors = order_errors("MATCH (n) WHERE true WHERE false RETURN n", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 21..32);
    }

    #[test]
    fn reading_after_update_needs_with() {
        let errors = order_errors("CREATE (n) MATCH (m) RETURN m", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 11..20);
        assert!(errors[0].help.is_some());
    }

    #[test]
    fn statement_must_end_in_terminal_state() {
        let errors = order_errors("MATCH (n) WHERE n.x = 1", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 10..23);
        assert!(errors[0].message.contains("cannot conclude with WHERE"));
    }

    #[test]
    fn each_union_branch_is_checked_separately() {
        let errors = order_errors("MATCH (n) RETURN n UNION MATCH (n)", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 25..34);
    }

    #[test]
    fn error_clauses_are_ignored() {
        let errors = order_errors("MATCH (n) WITH (n, [MATCH]) RETURN n", Dialect::OpenCypher);
        assert!(errors.is_empty());

        // The placeholder does not stand in for the MATCH it replaced.
        let errors = order_errors("MATCH (n:) WHERE n.x > 1 RETURN n", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 11..24);
    }

    #[test]
    fn subqueries_have_their_own_frame() {
        let source = "MATCH (n) WHERE exists { MATCH (n)-->(m) WHERE n.prop = m.prop RETURN m } \
                      RETURN n";
        assert!(order_errors(source, Dialect::Neo4j5).is_empty());

        // A subquery body need not end in RETURN, but its own order is checked.
        let source = "CALL { MATCH (n) WHERE true WHERE false } RETURN 1";
        let errors = order_errors(source, Dialect::Neo4j5);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 28..39);
    }

    #[test]
    fn procedure_call_alone_is_a_complete_query() {
        for dialect in [Dialect::OpenCypher, Dialect::Neo4j5] {
            for source in [
                "CALL db.labels()",
                "CALL db.labels",
                "CALL db.labels() YIELD label",
                "CALL db.labels() YIELD *",
                "CALL db.labels() YIELD label WHERE label STARTS WITH 'P'",
            ] {
                let errors = order_errors(source, dialect);
                assert!(errors.is_empty(), "{source} under {dialect}: {errors:?}");
            }
        }

        // Preceded or followed by other clauses, the call is no longer alone.
        let errors = order_errors("MATCH (n) CALL db.labels() YIELD label", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 10..38);
        assert!(errors[0].message.contains("cannot conclude with CALL"));
    }

    #[test]
    fn where_after_call_needs_yield() {
        let errors = order_errors("CALL db.labels() WHERE true RETURN 1", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 17..27);
        assert_eq!(errors[0].message, "WHERE cannot follow CALL");

        let errors = order_errors("CALL { RETURN 1 AS x } WHERE x > 0 RETURN x", Dialect::Neo4j5);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 23..34);
        assert!(errors[0].help.as_deref().unwrap().contains("YIELD"));

        let source = "MATCH (n) CALL db.labels() YIELD label WHERE label = 'A' RETURN n";
        assert!(order_errors(source, Dialect::OpenCypher).is_empty());
    }

    #[test]
    fn update_after_return_gets_a_hint() {
        let errors = order_errors("MATCH (n) RETURN n SET n.x = 1", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 19..30);
        assert!(errors[0].help.as_deref().unwrap().contains("before RETURN"));
    }

    #[test]
    fn neo4j5_accepts_trailing_call_and_call_after_update() {
        let source = "CREATE (n) CALL { MATCH (m) RETURN m }";
        assert!(order_errors(source, Dialect::Neo4j5).is_empty());
        let errors = order_errors("CREATE (n) CALL db.labels()", Dialect::OpenCypher);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 11..27);
    }
}
