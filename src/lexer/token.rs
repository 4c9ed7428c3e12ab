//! Token types produced by the Cypher lexer.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// A reserved word of the Cypher grammar.
///
/// Whether a word is lexed as a keyword depends on the active dialect's
/// keyword table; see [`crate::dialect::DialectRules::is_keyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    // Clauses
    Match,
    Optional,
    Where,
    With,
    Return,
    Unwind,
    Create,
    Merge,
    Delete,
    Detach,
    Set,
    Remove,
    Call,
    Yield,
    Union,

    // Clause modifiers
    All,
    As,
    On,
    Distinct,
    Order,
    By,
    Asc,
    Ascending,
    Desc,
    Descending,
    Skip,
    Limit,

    // Operators
    And,
    Or,
    Xor,
    Not,
    In,
    Is,
    Starts,
    Ends,
    Contains,

    // Literals
    Null,
    True,
    False,

    // Expressions
    Case,
    When,
    Then,
    Else,
    End,
    Exists,
}

impl Keyword {
    /// Canonical upper-case spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Match => "MATCH",
            Keyword::Optional => "OPTIONAL",
            Keyword::Where => "WHERE",
            Keyword::With => "WITH",
            Keyword::Return => "RETURN",
            Keyword::Unwind => "UNWIND",
            Keyword::Create => "CREATE",
            Keyword::Merge => "MERGE",
            Keyword::Delete => "DELETE",
            Keyword::Detach => "DETACH",
            Keyword::Set => "SET",
            Keyword::Remove => "REMOVE",
            Keyword::Call => "CALL",
            Keyword::Yield => "YIELD",
            Keyword::Union => "UNION",
            Keyword::All => "ALL",
            Keyword::As => "AS",
            Keyword::On => "ON",
            Keyword::Distinct => "DISTINCT",
            Keyword::Order => "ORDER",
            Keyword::By => "BY",
            Keyword::Asc => "ASC",
            Keyword::Ascending => "ASCENDING",
            Keyword::Desc => "DESC",
            Keyword::Descending => "DESCENDING",
            Keyword::Skip => "SKIP",
            Keyword::Limit => "LIMIT",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Xor => "XOR",
            Keyword::Not => "NOT",
            Keyword::In => "IN",
            Keyword::Is => "IS",
            Keyword::Starts => "STARTS",
            Keyword::Ends => "ENDS",
            Keyword::Contains => "CONTAINS",
            Keyword::Null => "NULL",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Case => "CASE",
            Keyword::When => "WHEN",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::Exists => "EXISTS",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(SmolStr),
    /// Backtick-quoted identifier with escapes resolved.
    QuotedIdentifier(SmolStr),

    /// Integer literal as written (decimal, `0x` hex or `0o` octal).
    Integer(SmolStr),
    /// Float literal as written.
    Float(SmolStr),
    /// String literal with escapes resolved.
    String(SmolStr),
    /// `$name` or `$0`, without the dollar sign.
    Parameter(SmolStr),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    RegexMatch,
    PlusEq,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    DotDot,
    Colon,
    Semicolon,
    Pipe,

    /// Text the lexer could not classify; a lexical diagnostic was recorded.
    Error,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::Keyword(Keyword::Null | Keyword::True | Keyword::False)
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::RegexMatch
                | TokenKind::PlusEq
        )
    }
}

impl From<Keyword> for TokenKind {
    fn from(keyword: Keyword) -> Self {
        TokenKind::Keyword(keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "{keyword}"),
            TokenKind::Identifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::QuotedIdentifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::Integer(text) | TokenKind::Float(text) => write!(f, "number {text}"),
            TokenKind::String(_) => write!(f, "string literal"),
            TokenKind::Parameter(name) => write!(f, "parameter ${name}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::NotEq => write!(f, "<>"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::RegexMatch => write!(f, "=~"),
            TokenKind::PlusEq => write!(f, "+="),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Error => write!(f, "invalid token"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its exact source text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub lexeme: SmolStr,
    pub span: Span,
    /// One-based line of `span.start`.
    pub line: u32,
    /// One-based column (in characters) of `span.start`.
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<SmolStr>, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            line,
            column,
        }
    }

    /// True when this token is the given keyword.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}
