//! Abstract syntax tree for Cypher documents.
//!
//! Nodes own their children and carry a byte [`Span`]; a child's span always
//! lies within its parent's span. [`Visit`] walks the tree.

mod clause;
mod document;
mod expression;
mod pattern;
mod span;
pub mod visit;

use smol_str::SmolStr;

pub use clause::{
    CallBody, CallClause, Clause, ClauseKind, CreateClause, DeleteClause, ErrorNode, MatchClause,
    MergeAction, MergeActionKind, MergeClause, ProcedureCall, Projection, ProjectionItem,
    RemoveClause, RemoveItem, ReturnClause, SetClause, SetItem, SortItem, UnwindClause,
    WhereClause, WithClause, YieldItem,
};
pub use document::{Document, Query, Statement, UnionBranch};
pub use expression::{
    BinaryOperator, CaseAlternative, CaseExpression, ExistsSubquery, Expression, FunctionCall,
    ListComprehension, Literal, MapEntry, Quantifier, UnaryOperator,
};
pub use pattern::{
    Direction, NodePattern, Pattern, PatternPart, PatternStep, RelationshipPattern,
    VariableLength,
};
pub use span::{LineIndex, Span, Spanned, merge_spans, span_contains};
pub use visit::Visit;

/// A name with its source span: variables, aliases, labels, property keys.
pub type Ident = Spanned<SmolStr>;
