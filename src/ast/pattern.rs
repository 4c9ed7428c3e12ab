//! Graph pattern AST nodes used by MATCH, CREATE and MERGE.

use crate::ast::{Expression, Ident, Span};

/// A comma-separated list of pattern parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub parts: Vec<PatternPart>,
    pub span: Span,
}

/// One path: `[p =] (a)-[r]->(b)...`
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPart {
    /// Path variable bound with `p = ...`.
    pub variable: Option<Ident>,
    pub start: NodePattern,
    pub chain: Vec<PatternStep>,
    pub span: Span,
}

impl PatternPart {
    /// Every variable this part binds, in source order.
    pub fn variables(&self) -> impl Iterator<Item = &Ident> {
        self.variable
            .iter()
            .chain(self.start.variable.iter())
            .chain(self.chain.iter().flat_map(|step| {
                step.relationship
                    .variable
                    .iter()
                    .chain(step.node.variable.iter())
            }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternStep {
    pub relationship: RelationshipPattern,
    pub node: NodePattern,
}

/// `(var:Label:Other {props})`
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Option<Ident>,
    pub labels: Vec<Ident>,
    /// A map literal or a parameter.
    pub properties: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `<-[]-`
    Left,
    /// `-[]->`
    Right,
    /// `-[]-`
    Undirected,
}

/// `-[var:TYPE|OTHER *1..3 {props}]->`
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub direction: Direction,
    pub variable: Option<Ident>,
    pub types: Vec<Ident>,
    pub length: Option<VariableLength>,
    pub properties: Option<Expression>,
    pub span: Span,
}

/// `*`, `*2`, `*1..`, `*..3`, `*1..3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLength {
    pub min: Option<u64>,
    pub max: Option<u64>,
}
