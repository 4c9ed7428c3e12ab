//! Expression AST nodes.
//!
//! Expressions appear in WHERE predicates, projections, property maps,
//! SET items and anywhere else the grammar embeds a value. Every variant
//! carries the span of the full expression.

use crate::ast::{Ident, PatternPart, Query, Span};
use smol_str::SmolStr;

// ============================================================================
// Expression
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal, Span),

    /// `$name` or `$0`
    Parameter(SmolStr, Span),

    Variable(SmolStr, Span),

    /// `expr.key`
    Property(Box<Expression>, Ident, Span),

    /// `expr[index]`
    Index(Box<Expression>, Box<Expression>, Span),

    /// `expr[from..to]`, both bounds optional
    Slice(
        Box<Expression>,
        Option<Box<Expression>>,
        Option<Box<Expression>>,
        Span,
    ),

    /// `n:Label:Other`
    HasLabels(Box<Expression>, Vec<Ident>, Span),

    List(Vec<Expression>, Span),

    Map(Vec<MapEntry>, Span),

    FunctionCall(FunctionCall),

    /// `count(*)`
    CountStar(Span),

    Unary(UnaryOperator, Box<Expression>, Span),

    Binary(BinaryOperator, Box<Expression>, Box<Expression>, Span),

    /// `expr IS NULL` (`negated == false`) or `expr IS NOT NULL`
    IsNull {
        operand: Box<Expression>,
        negated: bool,
        span: Span,
    },

    Case(CaseExpression),

    /// `[x IN list WHERE pred | projection]`
    ListComprehension(ListComprehension),

    /// `all(x IN list WHERE pred)` and friends
    Quantified(Quantifier, ListComprehension),

    /// `EXISTS { ... }`
    Exists(ExistsSubquery),

    /// A relationship pattern used as a predicate: `(n)-[:KNOWS]->()`
    PatternPredicate(Box<PatternPart>),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(_, span)
            | Expression::Parameter(_, span)
            | Expression::Variable(_, span)
            | Expression::Property(_, _, span)
            | Expression::Index(_, _, span)
            | Expression::Slice(_, _, _, span)
            | Expression::HasLabels(_, _, span)
            | Expression::List(_, span)
            | Expression::Map(_, span)
            | Expression::CountStar(span)
            | Expression::Unary(_, _, span)
            | Expression::Binary(_, _, _, span)
            | Expression::IsNull { span, .. } => span.clone(),
            Expression::FunctionCall(call) => call.span.clone(),
            Expression::Case(case) => case.span.clone(),
            Expression::ListComprehension(comprehension)
            | Expression::Quantified(_, comprehension) => comprehension.span.clone(),
            Expression::Exists(exists) => exists.span.clone(),
            Expression::PatternPredicate(part) => part.span.clone(),
        }
    }

    /// The variable name when this expression is a bare variable.
    pub fn as_variable(&self) -> Option<&SmolStr> {
        match self {
            Expression::Variable(name, _) => Some(name),
            _ => None,
        }
    }
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(SmolStr),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Ident,
    pub value: Expression,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    Xor,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    RegexMatch,
    StartsWith,
    EndsWith,
    Contains,
    In,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl BinaryOperator {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Lt
                | BinaryOperator::Gt
                | BinaryOperator::LtEq
                | BinaryOperator::GtEq
        )
    }
}

// ============================================================================
// Compound expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Function name; namespaced names are joined with `.`.
    pub name: SmolStr,
    pub distinct: bool,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    pub operand: Option<Box<Expression>>,
    pub alternatives: Vec<CaseAlternative>,
    pub default: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseAlternative {
    pub when: Expression,
    pub then: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListComprehension {
    pub variable: Ident,
    pub list: Box<Expression>,
    pub predicate: Option<Box<Expression>>,
    pub projection: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Any,
    None,
    Single,
}

impl Quantifier {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "all" => Some(Quantifier::All),
            "any" => Some(Quantifier::Any),
            "none" => Some(Quantifier::None),
            "single" => Some(Quantifier::Single),
            _ => None,
        }
    }
}

/// An existential subquery.
///
/// The body is an independently scoped query. The short form
/// `EXISTS { (a)-->(b) WHERE .. }` is stored as an implicit MATCH clause
/// followed by an optional WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsSubquery {
    pub body: Box<Query>,
    pub span: Span,
}
