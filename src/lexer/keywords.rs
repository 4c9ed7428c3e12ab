//! Keyword recognition.
//!
//! Cypher keywords are case-insensitive. [`lookup_keyword`] knows every
//! keyword of every dialect; callers filter the result through the active
//! dialect's keyword table.

use super::token::Keyword;

/// Looks up a keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<Keyword> {
    if name.len() > 10 {
        return None;
    }
    let keyword = match name.to_ascii_uppercase().as_str() {
        "MATCH" => Keyword::Match,
        "OPTIONAL" => Keyword::Optional,
        "WHERE" => Keyword::Where,
        "WITH" => Keyword::With,
        "RETURN" => Keyword::Return,
        "UNWIND" => Keyword::Unwind,
        "CREATE" => Keyword::Create,
        "MERGE" => Keyword::Merge,
        "DELETE" => Keyword::Delete,
        "DETACH" => Keyword::Detach,
        "SET" => Keyword::Set,
        "REMOVE" => Keyword::Remove,
        "CALL" => Keyword::Call,
        "YIELD" => Keyword::Yield,
        "UNION" => Keyword::Union,
        "ALL" => Keyword::All,
        "AS" => Keyword::As,
        "ON" => Keyword::On,
        "DISTINCT" => Keyword::Distinct,
        "ORDER" => Keyword::Order,
        "BY" => Keyword::By,
        "ASC" => Keyword::Asc,
        "ASCENDING" => Keyword::Ascending,
        "DESC" => Keyword::Desc,
        "DESCENDING" => Keyword::Descending,
        "SKIP" => Keyword::Skip,
        "LIMIT" => Keyword::Limit,
        "AND" => Keyword::And,
        "OR" => Keyword::Or,
        "XOR" => Keyword::Xor,
        "NOT" => Keyword::Not,
        "IN" => Keyword::In,
        "IS" => Keyword::Is,
        "STARTS" => Keyword::Starts,
        "ENDS" => Keyword::Ends,
        "CONTAINS" => Keyword::Contains,
        "NULL" => Keyword::Null,
        "TRUE" => Keyword::True,
        "FALSE" => Keyword::False,
        "CASE" => Keyword::Case,
        "WHEN" => Keyword::When,
        "THEN" => Keyword::Then,
        "ELSE" => Keyword::Else,
        "END" => Keyword::End,
        "EXISTS" => Keyword::Exists,
        _ => return None,
    };
    Some(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup_keyword("match"), Some(Keyword::Match));
        assert_eq!(lookup_keyword("MaTcH"), Some(Keyword::Match));
        assert_eq!(lookup_keyword("Descending"), Some(Keyword::Descending));
    }

    #[test]
    fn non_keywords_are_rejected() {
        assert_eq!(lookup_keyword("person"), None);
        assert_eq!(lookup_keyword("matches"), None);
        assert_eq!(lookup_keyword(""), None);
        assert_eq!(lookup_keyword("averyveryverylongidentifier"), None);
    }

    #[test]
    fn every_keyword_spelling_resolves_to_itself() {
        for keyword in crate::dialect::Dialect::Neo4j5.rules().keywords {
            assert_eq!(lookup_keyword(keyword.as_str()), Some(*keyword));
        }
    }
}
