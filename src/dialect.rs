//! Dialect tables.
//!
//! A dialect is pure data: the words it reserves, the grammar extensions it
//! enables and the legal clause orderings. Parser and validator read the
//! active [`DialectRules`] and never branch on the dialect itself. All tables
//! are immutable statics, so concurrent parses share them without locking.

use crate::ast::{Clause, ClauseKind};
use crate::lexer::Keyword;
use std::fmt;
use std::str::FromStr;

/// A named variant of the Cypher grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// Base openCypher 9.
    #[default]
    OpenCypher,
    /// Neo4j 5: adds `EXISTS { }` and `CALL { }` subqueries.
    Neo4j5,
}

impl Dialect {
    /// The rule table backing this dialect.
    pub fn rules(self) -> &'static DialectRules {
        match self {
            Dialect::OpenCypher => &OPEN_CYPHER,
            Dialect::Neo4j5 => &NEO4J_5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Dialect::OpenCypher => "opencypher",
            Dialect::Neo4j5 => "neo4j5",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Cypher dialect `{0}` (expected `opencypher` or `neo4j5`)")]
pub struct DialectParseError(pub String);

impl FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opencypher" | "open_cypher" | "cypher" => Ok(Dialect::OpenCypher),
            "neo4j5" | "neo4j-5" | "neo4j" => Ok(Dialect::Neo4j5),
            _ => Err(DialectParseError(s.to_string())),
        }
    }
}

// ============================================================================
// Clause ordering
// ============================================================================

/// Position within a clause sequence, as seen by the ordering check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    /// No clause seen yet.
    Start,
    /// After UNWIND.
    Reading,
    /// After MATCH or OPTIONAL MATCH.
    Matched,
    /// After a CALL subquery or a procedure call without YIELD.
    Called,
    /// After a procedure call with YIELD.
    Yielded,
    /// After WITH.
    Projected,
    /// After WHERE.
    Filtered,
    /// After CREATE, MERGE, DELETE, SET or REMOVE.
    Updating,
    /// After RETURN.
    Returned,
}

/// One legal step: a clause of kind `clause` seen in any state of `from`
/// moves the sequence to `to`.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub from: &'static [OrderState],
    pub clause: ClauseKind,
    pub to: OrderState,
}

/// Legal clause-sequence patterns of a dialect.
#[derive(Debug, Clone, Copy)]
pub struct OrderingTable {
    pub transitions: &'static [Transition],
    /// States a top-level statement may end in.
    pub terminal: &'static [OrderState],
}

impl OrderingTable {
    /// State after `clause`, or `None` when the clause is illegal here.
    pub fn next(&self, state: OrderState, clause: ClauseKind) -> Option<OrderState> {
        self.transitions
            .iter()
            .find(|t| t.clause == clause && t.from.contains(&state))
            .map(|t| t.to)
    }

    /// Like [`next`](Self::next), but moves a procedure call that yields
    /// into [`OrderState::Yielded`], the only CALL form WHERE may follow.
    pub fn after(&self, state: OrderState, clause: &Clause) -> Option<OrderState> {
        let next = self.next(state, clause.kind())?;
        Some(match clause {
            Clause::Call(call) if next == OrderState::Called && call.yields() => {
                OrderState::Yielded
            }
            _ => next,
        })
    }

    pub fn is_terminal(&self, state: OrderState) -> bool {
        self.terminal.contains(&state)
    }
}

// ============================================================================
// Rule tables
// ============================================================================

/// Everything the lexer, parser and validator need to know about a dialect.
#[derive(Debug)]
pub struct DialectRules {
    pub dialect: Dialect,
    /// Words lexed as keywords; anything else is an identifier.
    pub keywords: &'static [Keyword],
    /// `EXISTS { ... }` and `CALL { ... }` subqueries.
    pub subqueries: bool,
    pub ordering: OrderingTable,
    pub check_clause_order: bool,
    pub check_aliases: bool,
    /// Report `exists(n.prop)` as deprecated.
    pub deprecated_exists_function: bool,
}

impl DialectRules {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}

const BASE_KEYWORDS: &[Keyword] = &[
    Keyword::Match,
    Keyword::Optional,
    Keyword::Where,
    Keyword::With,
    Keyword::Return,
    Keyword::Unwind,
    Keyword::Create,
    Keyword::Merge,
    Keyword::Delete,
    Keyword::Detach,
    Keyword::Set,
    Keyword::Remove,
    Keyword::Call,
    Keyword::Yield,
    Keyword::Union,
    Keyword::All,
    Keyword::As,
    Keyword::On,
    Keyword::Distinct,
    Keyword::Order,
    Keyword::By,
    Keyword::Asc,
    Keyword::Ascending,
    Keyword::Desc,
    Keyword::Descending,
    Keyword::Skip,
    Keyword::Limit,
    Keyword::And,
    Keyword::Or,
    Keyword::Xor,
    Keyword::Not,
    Keyword::In,
    Keyword::Is,
    Keyword::Starts,
    Keyword::Ends,
    Keyword::Contains,
    Keyword::Null,
    Keyword::True,
    Keyword::False,
    Keyword::Case,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
];

const NEO4J_5_KEYWORDS: &[Keyword] = &[
    Keyword::Match,
    Keyword::Optional,
    Keyword::Where,
    Keyword::With,
    Keyword::Return,
    Keyword::Unwind,
    Keyword::Create,
    Keyword::Merge,
    Keyword::Delete,
    Keyword::Detach,
    Keyword::Set,
    Keyword::Remove,
    Keyword::Call,
    Keyword::Yield,
    Keyword::Union,
    Keyword::All,
    Keyword::As,
    Keyword::On,
    Keyword::Distinct,
    Keyword::Order,
    Keyword::By,
    Keyword::Asc,
    Keyword::Ascending,
    Keyword::Desc,
    Keyword::Descending,
    Keyword::Skip,
    Keyword::Limit,
    Keyword::And,
    Keyword::Or,
    Keyword::Xor,
    Keyword::Not,
    Keyword::In,
    Keyword::Is,
    Keyword::Starts,
    Keyword::Ends,
    Keyword::Contains,
    Keyword::Null,
    Keyword::True,
    Keyword::False,
    Keyword::Case,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
    Keyword::Exists,
];

use OrderState::*;

/// States from which a reading clause may start.
const READABLE: &[OrderState] = &[Start, Reading, Matched, Called, Yielded, Projected, Filtered];
/// Every state except `Returned`.
const OPEN: &[OrderState] = &[
    Start, Reading, Matched, Called, Yielded, Projected, Filtered, Updating,
];
const FILTERABLE: &[OrderState] = &[Matched, Yielded, Projected];

const fn step(from: &'static [OrderState], clause: ClauseKind, to: OrderState) -> Transition {
    Transition { from, clause, to }
}

const OPEN_CYPHER_TRANSITIONS: &[Transition] = &[
    step(READABLE, ClauseKind::Match, Matched),
    step(READABLE, ClauseKind::Unwind, Reading),
    step(READABLE, ClauseKind::Call, Called),
    step(FILTERABLE, ClauseKind::Where, Filtered),
    step(OPEN, ClauseKind::With, Projected),
    step(OPEN, ClauseKind::Create, Updating),
    step(OPEN, ClauseKind::Merge, Updating),
    step(OPEN, ClauseKind::Delete, Updating),
    step(OPEN, ClauseKind::Set, Updating),
    step(OPEN, ClauseKind::Remove, Updating),
    step(OPEN, ClauseKind::Return, Returned),
];

const NEO4J_5_TRANSITIONS: &[Transition] = &[
    step(READABLE, ClauseKind::Match, Matched),
    step(READABLE, ClauseKind::Unwind, Reading),
    step(OPEN, ClauseKind::Call, Called),
    step(FILTERABLE, ClauseKind::Where, Filtered),
    step(OPEN, ClauseKind::With, Projected),
    step(OPEN, ClauseKind::Create, Updating),
    step(OPEN, ClauseKind::Merge, Updating),
    step(OPEN, ClauseKind::Delete, Updating),
    step(OPEN, ClauseKind::Set, Updating),
    step(OPEN, ClauseKind::Remove, Updating),
    step(OPEN, ClauseKind::Return, Returned),
];

static OPEN_CYPHER: DialectRules = DialectRules {
    dialect: Dialect::OpenCypher,
    keywords: BASE_KEYWORDS,
    subqueries: false,
    ordering: OrderingTable {
        transitions: OPEN_CYPHER_TRANSITIONS,
        terminal: &[Returned, Updating],
    },
    check_clause_order: true,
    check_aliases: true,
    deprecated_exists_function: false,
};

static NEO4J_5: DialectRules = DialectRules {
    dialect: Dialect::Neo4j5,
    keywords: NEO4J_5_KEYWORDS,
    subqueries: true,
    ordering: OrderingTable {
        transitions: NEO4J_5_TRANSITIONS,
        terminal: &[Returned, Updating, Called, Yielded],
    },
    check_clause_order: true,
    check_aliases: true,
    deprecated_exists_function: true,
};
