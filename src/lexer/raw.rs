//! Dialect-independent scanner built on `logos`.
//!
//! The raw layer only splits text into lexemes. Keyword classification,
//! positions and diagnostics are added by [`super::Lexer`].

use crate::ast::Span;
use logos::{Lexer as LogosLexer, Logos};

/// Outcome of scanning a quoted string or identifier body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuotedScan {
    /// Content with escapes resolved.
    pub value: String,
    pub terminated: bool,
    /// Absolute spans of escape sequences that are not defined.
    pub invalid_escapes: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentScan {
    pub terminated: bool,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|//[^\n]*)")]
pub enum RawToken {
    #[token("/*", lex_block_comment)]
    BlockComment(CommentScan),

    #[regex(r"[\p{XID_Start}_][\p{XID_Continue}]*")]
    Word,

    #[token("`", lex_quoted_identifier)]
    QuotedIdentifier(QuotedScan),

    #[token("'", lex_single_quoted)]
    #[token("\"", lex_double_quoted)]
    String(QuotedScan),

    #[regex(r"[0-9]+")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0o[0-7]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    /// A number whose exponent has no digits, e.g. `1e` or `2.5E+`.
    #[regex(r"[0-9]+(\.[0-9]+)?[eE][+-]?")]
    #[regex(r"\.[0-9]+[eE][+-]?")]
    MalformedNumber,

    #[regex(r"\$[\p{XID_Start}_][\p{XID_Continue}]*")]
    #[regex(r"\$[0-9]+")]
    Parameter,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=~")]
    RegexMatch,
    #[token("+=")]
    PlusEq,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("|")]
    Pipe,
}

fn lex_block_comment(lex: &mut LogosLexer<'_, RawToken>) -> CommentScan {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            CommentScan { terminated: true }
        }
        None => {
            lex.bump(lex.remainder().len());
            CommentScan { terminated: false }
        }
    }
}

fn lex_single_quoted(lex: &mut LogosLexer<'_, RawToken>) -> QuotedScan {
    lex_quoted(lex, '\'')
}

fn lex_double_quoted(lex: &mut LogosLexer<'_, RawToken>) -> QuotedScan {
    lex_quoted(lex, '"')
}

/// Scans a string body up to the closing `quote`, resolving escapes.
///
/// Recognized escapes: `\t \b \n \r \f \' \" \\` plus `\uXXXX` and
/// `\UXXXXXXXX`. Unknown escapes are recorded and kept verbatim.
fn lex_quoted(lex: &mut LogosLexer<'_, RawToken>, quote: char) -> QuotedScan {
    let base = lex.span().end;
    let rest = lex.remainder();
    let mut scan = QuotedScan::default();
    let mut pos = 0;

    while let Some(ch) = rest[pos..].chars().next() {
        if ch == quote {
            pos += ch.len_utf8();
            scan.terminated = true;
            break;
        }
        if ch != '\\' {
            scan.value.push(ch);
            pos += ch.len_utf8();
            continue;
        }

        let escape_start = pos;
        pos += 1;
        let Some(escaped) = rest[pos..].chars().next() else {
            scan.value.push('\\');
            break;
        };
        pos += escaped.len_utf8();
        let resolved = match escaped {
            't' => Some('\t'),
            'b' => Some('\u{8}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            'f' => Some('\u{c}'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            'u' | 'U' => {
                let width = if escaped == 'u' { 4 } else { 8 };
                let decoded = rest
                    .get(pos..pos + width)
                    .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
                    .and_then(|digits| u32::from_str_radix(digits, 16).ok())
                    .and_then(char::from_u32);
                if decoded.is_some() {
                    pos += width;
                }
                decoded
            }
            _ => None,
        };
        match resolved {
            Some(ch) => scan.value.push(ch),
            None => {
                scan.invalid_escapes.push(base + escape_start..base + pos);
                scan.value.push_str(&rest[escape_start..pos]);
            }
        }
    }

    lex.bump(pos);
    scan
}

/// Scans a backtick identifier; a doubled backtick stands for one backtick.
fn lex_quoted_identifier(lex: &mut LogosLexer<'_, RawToken>) -> QuotedScan {
    let rest = lex.remainder();
    let mut scan = QuotedScan::default();
    let mut pos = 0;

    while let Some(ch) = rest[pos..].chars().next() {
        pos += ch.len_utf8();
        if ch != '`' {
            scan.value.push(ch);
            continue;
        }
        if rest[pos..].starts_with('`') {
            scan.value.push('`');
            pos += 1;
            continue;
        }
        scan.terminated = true;
        break;
    }

    lex.bump(pos);
    scan
}
