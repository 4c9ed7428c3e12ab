//! Root AST nodes: documents, statements and queries.

use crate::ast::{Clause, ErrorNode, Span};

/// Root of a parsed source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// One `;`-separated unit of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Query),
    /// A statement in which no clause could be recognized (recovery mode).
    Error(ErrorNode),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Query(query) => query.span.clone(),
            Statement::Error(error) => error.span.clone(),
        }
    }

    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Statement::Query(query) => Some(query),
            Statement::Error(_) => None,
        }
    }
}

/// A clause sequence, optionally combined with further branches by UNION.
///
/// Also used as the body of subqueries.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub clauses: Vec<Clause>,
    pub unions: Vec<UnionBranch>,
    pub span: Span,
}

impl Query {
    /// Clause sequences of every branch, the leading branch first.
    pub fn branches(&self) -> impl Iterator<Item = &[Clause]> {
        std::iter::once(self.clauses.as_slice())
            .chain(self.unions.iter().map(|branch| branch.clauses.as_slice()))
    }
}

/// `UNION [ALL] <clauses>`
#[derive(Debug, Clone, PartialEq)]
pub struct UnionBranch {
    pub all: bool,
    pub clauses: Vec<Clause>,
    /// From the `UNION` keyword to the end of the branch.
    pub span: Span,
}
