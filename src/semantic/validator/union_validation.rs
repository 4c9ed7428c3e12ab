//! UNION consistency (CYP302, CYP303).

use smol_str::SmolStr;

use crate::ast::visit::{Visit, VisitResult, walk_query};
use crate::ast::{Clause, Document, Query};
use crate::diag::{Diag, DiagCode, DiagnosticSink};

pub(super) fn run_union_validation(document: &Document, sink: &mut DiagnosticSink) {
    let _ = UnionChecker { sink }.visit_document(document);
}

struct UnionChecker<'a> {
    sink: &'a mut DiagnosticSink,
}

impl Visit for UnionChecker<'_> {
    type Break = ();

    fn visit_query(&mut self, query: &Query) -> VisitResult<()> {
        check_union(query, self.sink);
        walk_query(self, query)
    }
}

fn check_union(query: &Query, sink: &mut DiagnosticSink) {
    let Some(first_union) = query.unions.first() else {
        return;
    };

    if let Some(mixed) = query.unions.iter().find(|u| u.all != first_union.all) {
        sink.push(
            Diag::error("UNION and UNION ALL cannot be mixed in one query")
                .with_primary_label(mixed.span.clone(), "differs from the first UNION")
                .with_secondary_label(first_union.span.clone(), "first UNION")
                .with_code(DiagCode::MixedUnion),
        );
    }

    let Some(expected) = columns(&query.clauses) else {
        return;
    };
    for branch in &query.unions {
        let Some(found) = columns(&branch.clauses) else {
            continue;
        };
        if !same_columns(&expected, &found) {
            sink.push(
                Diag::error("all sub queries in a UNION must return the same column names")
                    .with_primary_label(branch.span.clone(), "columns differ from the first branch")
                    .with_note(format!(
                        "first branch returns {}, this branch returns {}",
                        describe(&expected),
                        describe(&found)
                    ))
                    .with_code(DiagCode::UnionColumnMismatch),
            );
        }
    }
}

/// Column names of a branch ending in RETURN; `None` when the branch has no
/// final RETURN or projects `*`. Unnamed columns are `None`.
fn columns(clauses: &[Clause]) -> Option<Vec<Option<SmolStr>>> {
    match clauses.last() {
        Some(Clause::Return(ret)) if !ret.projection.star => Some(
            ret.projection
                .items
                .iter()
                .map(|item| item.binding().map(|binding| binding.node))
                .collect(),
        ),
        _ => None,
    }
}

/// Unnamed columns match anything in the same position.
fn same_columns(a: &[Option<SmolStr>], b: &[Option<SmolStr>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (Some(x), Some(y)) => x == y,
            _ => true,
        })
}

fn describe(columns: &[Option<SmolStr>]) -> String {
    let names: Vec<&str> = columns
        .iter()
        .map(|name| name.as_deref().unwrap_or("_"))
        .collect();
    format!("({})", names.join(", "))
}
