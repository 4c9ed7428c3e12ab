//! Per-invocation parse configuration.

use crate::dialect::Dialect;

/// Default limit on nested expressions and subqueries.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Options for one [`parse`](crate::parse) call.
///
/// ```
/// use cypher_parser::{CypherParseOptions, Dialect};
///
/// let options = CypherParseOptions::default()
///     .with_dialect(Dialect::Neo4j5)
///     .with_recover_errors(true);
/// assert!(options.recover_errors);
/// assert_eq!(options.max_nesting_depth, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CypherParseOptions {
    /// Keep parsing after syntax errors, replacing failed clauses with
    /// error placeholders. When false the first syntax error ends the parse
    /// and no document is returned.
    pub recover_errors: bool,

    pub dialect: Dialect,

    /// Deepest nesting of expressions and subqueries accepted before CYP202.
    pub max_nesting_depth: usize,
}

impl Default for CypherParseOptions {
    fn default() -> Self {
        Self {
            recover_errors: false,
            dialect: Dialect::OpenCypher,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl CypherParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recover_errors(mut self, recover: bool) -> Self {
        self.recover_errors = recover;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
