//! Stable diagnostic codes.
//!
//! Codes are partitioned by numeric range into families: `CYP0xx` lexical,
//! `CYP1xx`/`CYP2xx` syntax and `CYP3xx` semantic. Published values are never
//! renumbered; new codes are appended within their family.

use std::fmt;

/// Family a diagnostic code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagFamily {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for DiagFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagFamily::Lexical => write!(f, "lexical"),
            DiagFamily::Syntax => write!(f, "syntax"),
            DiagFamily::Semantic => write!(f, "semantic"),
        }
    }
}

/// A stable diagnostic identifier such as `CYP300`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagCode {
    // ========================================================================
    // Lexical
    // ========================================================================
    /// A character that cannot start any token.
    UnrecognizedCharacter,
    /// A string literal without its closing quote.
    UnterminatedString,
    /// A backslash escape the language does not define.
    InvalidEscape,
    /// A numeric literal that does not match any numeric form.
    MalformedNumber,
    /// A `/*` comment without its closing `*/`.
    UnterminatedComment,
    /// A backtick-quoted identifier without its closing backtick.
    UnterminatedQuotedIdentifier,

    // ========================================================================
    // Syntax (token level)
    // ========================================================================
    /// A token that cannot appear at this position.
    UnexpectedToken,
    /// A required token is missing.
    ExpectedToken,
    /// Input ended in the middle of a construct.
    UnexpectedEndOfInput,
    /// An integer literal that does not fit in 64 bits.
    IntegerOutOfRange,

    // ========================================================================
    // Syntax (clause level)
    // ========================================================================
    /// Grammar the active dialect does not support.
    UnsupportedInDialect,
    /// A statement or clause assembled from parts that cannot combine.
    InvalidClauseComposition,
    /// Expressions or subqueries nested deeper than the configured limit.
    NestingTooDeep,

    // ========================================================================
    // Semantic
    // ========================================================================
    /// A clause appears where the clause grammar does not allow it.
    ClauseOrder,
    /// Two projection items bind the same alias.
    AliasConflict,
    /// UNION branches project different column names.
    UnionColumnMismatch,
    /// UNION and UNION ALL combined in one statement.
    MixedUnion,
    /// Syntax accepted but deprecated by the active dialect.
    Deprecated,
}

impl DiagCode {
    /// Returns the stable textual code, e.g. `"CYP301"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagCode::UnrecognizedCharacter => "CYP001",
            DiagCode::UnterminatedString => "CYP002",
            DiagCode::InvalidEscape => "CYP003",
            DiagCode::MalformedNumber => "CYP004",
            DiagCode::UnterminatedComment => "CYP005",
            DiagCode::UnterminatedQuotedIdentifier => "CYP006",
            DiagCode::UnexpectedToken => "CYP100",
            DiagCode::ExpectedToken => "CYP101",
            DiagCode::UnexpectedEndOfInput => "CYP102",
            DiagCode::IntegerOutOfRange => "CYP103",
            DiagCode::UnsupportedInDialect => "CYP200",
            DiagCode::InvalidClauseComposition => "CYP201",
            DiagCode::NestingTooDeep => "CYP202",
            DiagCode::ClauseOrder => "CYP300",
            DiagCode::AliasConflict => "CYP301",
            DiagCode::UnionColumnMismatch => "CYP302",
            DiagCode::MixedUnion => "CYP303",
            DiagCode::Deprecated => "CYP310",
        }
    }

    /// Returns the numeric part of the code.
    pub fn number(self) -> u16 {
        // Every code is "CYP" followed by three ASCII digits.
        self.as_str()[3..].parse().unwrap_or(0)
    }

    /// Returns the family this code belongs to, derived from its numeric range.
    pub fn family(self) -> DiagFamily {
        match self.number() {
            0..=99 => DiagFamily::Lexical,
            100..=299 => DiagFamily::Syntax,
            _ => DiagFamily::Semantic,
        }
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
