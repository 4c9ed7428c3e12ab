//! Alias uniqueness and visibility (CYP301).
//!
//! Within one WITH or RETURN no two items may bind the same name. Across
//! clauses, a projection replaces the frame's visible set with its own
//! bindings, so rebinding a name in a later projection is shadowing and
//! never a conflict.

use std::collections::{BTreeSet, HashMap};

use smol_str::SmolStr;

use crate::ast::{CallBody, Clause, Document, Ident, PatternPart, Projection, Query, Span, Statement};
use crate::diag::{Diag, DiagCode, DiagnosticSink};
use crate::semantic::{ScopeKind, ScopeTracker};

use super::for_each_subquery;

pub(super) fn run_alias_validation(
    document: &Document,
    scopes: &mut ScopeTracker,
    sink: &mut DiagnosticSink,
) {
    for statement in &document.statements {
        if let Statement::Query(query) = statement {
            check_query(query, ScopeKind::Statement, scopes, sink);
        }
    }
}

fn check_query(
    query: &Query,
    kind: ScopeKind,
    scopes: &mut ScopeTracker,
    sink: &mut DiagnosticSink,
) {
    for clauses in query.branches() {
        scopes.push(kind);
        for clause in clauses {
            for_each_subquery(clause, |body| {
                check_query(body, ScopeKind::Subquery, scopes, sink);
            });
            bind_clause(clause, scopes, sink);
        }
        scopes.pop();
    }
}

fn bind_clause(clause: &Clause, scopes: &mut ScopeTracker, sink: &mut DiagnosticSink) {
    match clause {
        Clause::With(c) => project(&c.projection, scopes, sink),
        Clause::Return(c) => project(&c.projection, scopes, sink),
        Clause::Match(c) => bind_parts(&c.pattern.parts, scopes),
        Clause::Create(c) => bind_parts(&c.pattern.parts, scopes),
        Clause::Merge(c) => bind_parts(std::slice::from_ref(&c.pattern), scopes),
        Clause::Unwind(c) => scopes.bind(c.variable.node.clone()),
        Clause::Call(c) => match &c.body {
            CallBody::Procedure(call) => {
                for item in &call.yield_items {
                    scopes.bind(item.binding().node.clone());
                }
            }
            CallBody::Subquery(body) => {
                for name in returned_names(body) {
                    scopes.bind(name);
                }
            }
        },
        Clause::Where(_) | Clause::Delete(_) | Clause::Set(_) | Clause::Remove(_) => {}
        Clause::Error(_) => {}
    }
}

fn bind_parts(parts: &[PatternPart], scopes: &mut ScopeTracker) {
    for part in parts {
        for variable in part.variables() {
            scopes.bind(variable.node.clone());
        }
    }
}

/// Reports duplicate bindings and replaces the visible set.
fn project(projection: &Projection, scopes: &mut ScopeTracker, sink: &mut DiagnosticSink) {
    let mut visible: BTreeSet<SmolStr> = if projection.star {
        scopes
            .current_frame()
            .map(|frame| frame.visible().clone())
            .unwrap_or_default()
    } else {
        BTreeSet::new()
    };

    let mut first_seen: HashMap<SmolStr, Span> = HashMap::new();
    for binding in projection.items.iter().filter_map(|item| item.binding()) {
        match first_seen.get(&binding.node) {
            Some(first) => sink.push(duplicate_alias(&binding, first.clone())),
            None => {
                first_seen.insert(binding.node.clone(), binding.span.clone());
            }
        }
        visible.insert(binding.node);
    }

    scopes.replace_visible(visible);
}

/// Names a CALL subquery hands back to the enclosing query.
fn returned_names(body: &Query) -> Vec<SmolStr> {
    match body.clauses.last() {
        Some(Clause::Return(ret)) => ret
            .projection
            .items
            .iter()
            .filter_map(|item| item.binding())
            .map(|binding| binding.node)
            .collect(),
        _ => Vec::new(),
    }
}

fn duplicate_alias(binding: &Ident, first: Span) -> Diag {
    Diag::error(format!("`{}` is bound more than once in this projection", binding.node))
        .with_primary_label(binding.span.clone(), "duplicate alias")
        .with_secondary_label(first, "first bound here")
        .with_help("give each projected column a distinct name")
        .with_code(DiagCode::AliasConflict)
}
