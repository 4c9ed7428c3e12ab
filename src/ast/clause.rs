//! Clause AST nodes.
//!
//! [`Clause`] is a closed set of variants. MERGE actions (`ON CREATE SET`,
//! `ON MATCH SET`) are data of [`MergeClause`] and never appear in a clause
//! sequence of their own.

use crate::ast::{Expression, Ident, Pattern, PatternPart, Query, Span};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Match(MatchClause),
    Where(WhereClause),
    With(WithClause),
    Return(ReturnClause),
    Unwind(UnwindClause),
    Create(CreateClause),
    Merge(MergeClause),
    Delete(DeleteClause),
    Set(SetClause),
    Remove(RemoveClause),
    Call(CallClause),
    /// Placeholder left where a clause failed to parse in recovery mode.
    Error(ErrorNode),
}

impl Clause {
    pub fn kind(&self) -> ClauseKind {
        match self {
            Clause::Match(_) => ClauseKind::Match,
            Clause::Where(_) => ClauseKind::Where,
            Clause::With(_) => ClauseKind::With,
            Clause::Return(_) => ClauseKind::Return,
            Clause::Unwind(_) => ClauseKind::Unwind,
            Clause::Create(_) => ClauseKind::Create,
            Clause::Merge(_) => ClauseKind::Merge,
            Clause::Delete(_) => ClauseKind::Delete,
            Clause::Set(_) => ClauseKind::Set,
            Clause::Remove(_) => ClauseKind::Remove,
            Clause::Call(_) => ClauseKind::Call,
            Clause::Error(_) => ClauseKind::Error,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Clause::Match(c) => c.span.clone(),
            Clause::Where(c) => c.span.clone(),
            Clause::With(c) => c.span.clone(),
            Clause::Return(c) => c.span.clone(),
            Clause::Unwind(c) => c.span.clone(),
            Clause::Create(c) => c.span.clone(),
            Clause::Merge(c) => c.span.clone(),
            Clause::Delete(c) => c.span.clone(),
            Clause::Set(c) => c.span.clone(),
            Clause::Remove(c) => c.span.clone(),
            Clause::Call(c) => c.span.clone(),
            Clause::Error(c) => c.span.clone(),
        }
    }
}

/// Discriminant of [`Clause`], used by ordering tables and scope frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Match,
    Where,
    With,
    Return,
    Unwind,
    Create,
    Merge,
    Delete,
    Set,
    Remove,
    Call,
    Error,
}

impl ClauseKind {
    /// True for CREATE, MERGE, DELETE, SET and REMOVE.
    pub fn is_updating(self) -> bool {
        matches!(
            self,
            ClauseKind::Create
                | ClauseKind::Merge
                | ClauseKind::Delete
                | ClauseKind::Set
                | ClauseKind::Remove
        )
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseKind::Match => "MATCH",
            ClauseKind::Where => "WHERE",
            ClauseKind::With => "WITH",
            ClauseKind::Return => "RETURN",
            ClauseKind::Unwind => "UNWIND",
            ClauseKind::Create => "CREATE",
            ClauseKind::Merge => "MERGE",
            ClauseKind::Delete => "DELETE",
            ClauseKind::Set => "SET",
            ClauseKind::Remove => "REMOVE",
            ClauseKind::Call => "CALL",
            ClauseKind::Error => "<error>",
        };
        f.write_str(name)
    }
}

/// Recovery placeholder covering the tokens that were discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub span: Span,
}

// ============================================================================
// Reading clauses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    pub optional: bool,
    pub pattern: Pattern,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub predicate: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnwindClause {
    pub expression: Expression,
    pub variable: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallClause {
    pub body: CallBody,
    pub span: Span,
}

impl CallClause {
    pub fn procedure(&self) -> Option<&ProcedureCall> {
        match &self.body {
            CallBody::Procedure(procedure) => Some(procedure),
            CallBody::Subquery(_) => None,
        }
    }

    /// True for a procedure call with a YIELD.
    pub fn yields(&self) -> bool {
        self.procedure().is_some_and(ProcedureCall::yields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallBody {
    /// `CALL db.labels() YIELD label`
    Procedure(ProcedureCall),
    /// `CALL { ... }`
    Subquery(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    /// Namespaced name, e.g. `db.labels`.
    pub name: Ident,
    /// `None` for the implicit-argument form `CALL db.labels`.
    pub arguments: Option<Vec<Expression>>,
    pub yield_items: Vec<YieldItem>,
    /// `YIELD *`
    pub yield_all: bool,
}

impl ProcedureCall {
    pub fn yields(&self) -> bool {
        self.yield_all || !self.yield_items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldItem {
    pub field: Ident,
    pub alias: Option<Ident>,
}

impl YieldItem {
    /// The name this item binds.
    pub fn binding(&self) -> &Ident {
        self.alias.as_ref().unwrap_or(&self.field)
    }
}

// ============================================================================
// Projections
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub projection: Projection,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnClause {
    pub projection: Projection,
    pub span: Span,
}

/// Body shared by WITH and RETURN.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub distinct: bool,
    /// Leading `*` carrying every visible binding forward.
    pub star: bool,
    pub items: Vec<ProjectionItem>,
    pub order_by: Vec<SortItem>,
    pub skip: Option<Expression>,
    pub limit: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expression: Expression,
    pub alias: Option<Ident>,
    pub span: Span,
}

impl ProjectionItem {
    /// The alias this item binds: the explicit `AS` name, or the variable
    /// itself for a bare variable reference.
    pub fn binding(&self) -> Option<Ident> {
        match (&self.alias, &self.expression) {
            (Some(alias), _) => Some(alias.clone()),
            (None, Expression::Variable(name, span)) => Some(Ident::new(name.clone(), span.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub expression: Expression,
    pub descending: bool,
    pub span: Span,
}

// ============================================================================
// Updating clauses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CreateClause {
    pub pattern: Pattern,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeClause {
    pub pattern: PatternPart,
    pub actions: Vec<MergeAction>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeActionKind {
    OnCreate,
    OnMatch,
}

/// `ON CREATE SET ...` or `ON MATCH SET ...` attached to a MERGE.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeAction {
    pub kind: MergeActionKind,
    pub items: Vec<SetItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteClause {
    pub detach: bool,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub items: Vec<SetItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    /// `n.prop = expr`
    Property {
        target: Expression,
        value: Expression,
        span: Span,
    },
    /// `n = {map}`
    Replace {
        variable: Ident,
        value: Expression,
        span: Span,
    },
    /// `n += {map}`
    Merge {
        variable: Ident,
        value: Expression,
        span: Span,
    },
    /// `n:Label:Other`
    Labels {
        variable: Ident,
        labels: Vec<Ident>,
        span: Span,
    },
}

impl SetItem {
    pub fn span(&self) -> Span {
        match self {
            SetItem::Property { span, .. }
            | SetItem::Replace { span, .. }
            | SetItem::Merge { span, .. }
            | SetItem::Labels { span, .. } => span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveClause {
    pub items: Vec<RemoveItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoveItem {
    /// `n.prop`
    Property(Expression),
    /// `n:Label`
    Labels {
        variable: Ident,
        labels: Vec<Ident>,
        span: Span,
    },
}

impl RemoveItem {
    pub fn span(&self) -> Span {
        match self {
            RemoveItem::Property(expression) => expression.span(),
            RemoveItem::Labels { span, .. } => span.clone(),
        }
    }
}
