//! Pratt expression parser shared by every clause that embeds a value.
//!
//! Precedence, loosest first: `OR`, `XOR`, `AND`, prefix `NOT`, comparisons,
//! the string/list predicates (`STARTS WITH`, `ENDS WITH`, `CONTAINS`, `IN`,
//! `=~`, `IS [NOT] NULL`), `+ -`, `* / %`, `^`, prefix `+ -` and finally
//! the postfix forms (`.key`, `[i]`, `[a..b]`, `:Label`). Comparisons chain:
//! `a < b < c` means `a < b AND b < c`.

use crate::ast::{
    BinaryOperator, CaseAlternative, CaseExpression, Clause, ExistsSubquery, Expression,
    FunctionCall, Ident, ListComprehension, Literal, MapEntry, MatchClause, Quantifier, Query,
    UnaryOperator,
};
use crate::diag::{Diag, DiagCode};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::{ParseError, ParseResult, Parser};
use crate::semantic::ScopeKind;

// Binding powers: higher binds tighter. The left power is checked against
// `min_bp`, the right power is passed to the recursive call.
mod bp {
    pub const OR: (u8, u8) = (1, 2);
    pub const XOR: (u8, u8) = (3, 4);
    pub const AND: (u8, u8) = (5, 6);
    pub const NOT_PREFIX: u8 = 7;
    pub const COMPARISON: (u8, u8) = (9, 10);
    pub const PREDICATE: (u8, u8) = (11, 12);
    pub const ADD: (u8, u8) = (13, 14);
    pub const MUL: (u8, u8) = (15, 16);
    pub const POWER: (u8, u8) = (17, 18);
    pub const UNARY: u8 = 19;
    pub const POSTFIX: u8 = 21;
}

impl Parser<'_> {
    pub(super) fn expression(&mut self) -> ParseResult<Expression> {
        self.expression_bp(0)
    }

    /// An atom with its postfix operators only, e.g. `n.address.city`.
    pub(super) fn postfix_expression(&mut self) -> ParseResult<Expression> {
        self.expression_bp(bp::POSTFIX)
    }

    fn expression_bp(&mut self, min_bp: u8) -> ParseResult<Expression> {
        self.nested(|parser| parser.expression_bp_inner(min_bp))
    }

    fn expression_bp_inner(&mut self, min_bp: u8) -> ParseResult<Expression> {
        let mut lhs = self.prefix_expression()?;
        // Right operand of the previous comparison at this level.
        let mut chained: Option<Expression> = None;

        loop {
            if self.at_postfix() {
                if bp::POSTFIX < min_bp {
                    break;
                }
                lhs = self.postfix(lhs)?;
                chained = None;
                continue;
            }

            if self.stream.check_keyword(Keyword::Is) {
                if bp::PREDICATE.0 < min_bp {
                    break;
                }
                lhs = self.is_null(lhs)?;
                chained = None;
                continue;
            }

            let Some((op, (l_bp, r_bp), width)) = self.infix_operator() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            for _ in 0..width {
                self.stream.advance();
            }
            let rhs = self.expression_bp(r_bp)?;

            if op.is_comparison() {
                lhs = match chained.take() {
                    Some(left) => {
                        let comparison = binary(op, left, rhs.clone());
                        binary(BinaryOperator::And, lhs, comparison)
                    }
                    None => binary(op, lhs, rhs.clone()),
                };
                chained = Some(rhs);
            } else {
                lhs = binary(op, lhs, rhs);
                chained = None;
            }
        }

        Ok(lhs)
    }

    /// The binary operator at the current token with its binding powers and
    /// the number of tokens it spans.
    fn infix_operator(&self) -> Option<(BinaryOperator, (u8, u8), usize)> {
        let next_is_with = self.stream.peek_kind(1) == &TokenKind::Keyword(Keyword::With);
        let operator = match self.stream.current_kind() {
            TokenKind::Keyword(Keyword::Or) => (BinaryOperator::Or, bp::OR, 1),
            TokenKind::Keyword(Keyword::Xor) => (BinaryOperator::Xor, bp::XOR, 1),
            TokenKind::Keyword(Keyword::And) => (BinaryOperator::And, bp::AND, 1),
            TokenKind::Eq => (BinaryOperator::Eq, bp::COMPARISON, 1),
            TokenKind::NotEq => (BinaryOperator::NotEq, bp::COMPARISON, 1),
            TokenKind::Lt => (BinaryOperator::Lt, bp::COMPARISON, 1),
            TokenKind::Gt => (BinaryOperator::Gt, bp::COMPARISON, 1),
            TokenKind::LtEq => (BinaryOperator::LtEq, bp::COMPARISON, 1),
            TokenKind::GtEq => (BinaryOperator::GtEq, bp::COMPARISON, 1),
            TokenKind::RegexMatch => (BinaryOperator::RegexMatch, bp::PREDICATE, 1),
            TokenKind::Keyword(Keyword::In) => (BinaryOperator::In, bp::PREDICATE, 1),
            TokenKind::Keyword(Keyword::Contains) => (BinaryOperator::Contains, bp::PREDICATE, 1),
            TokenKind::Keyword(Keyword::Starts) if next_is_with => {
                (BinaryOperator::StartsWith, bp::PREDICATE, 2)
            }
            TokenKind::Keyword(Keyword::Ends) if next_is_with => {
                (BinaryOperator::EndsWith, bp::PREDICATE, 2)
            }
            TokenKind::Plus => (BinaryOperator::Add, bp::ADD, 1),
            TokenKind::Minus => (BinaryOperator::Subtract, bp::ADD, 1),
            TokenKind::Star => (BinaryOperator::Multiply, bp::MUL, 1),
            TokenKind::Slash => (BinaryOperator::Divide, bp::MUL, 1),
            TokenKind::Percent => (BinaryOperator::Modulo, bp::MUL, 1),
            TokenKind::Caret => (BinaryOperator::Power, bp::POWER, 1),
            _ => return None,
        };
        Some(operator)
    }

    /// `IS NULL` / `IS NOT NULL`
    fn is_null(&mut self, operand: Expression) -> ParseResult<Expression> {
        self.stream.advance();
        let negated = self.stream.consume_keyword(Keyword::Not);
        self.stream.expect_keyword(Keyword::Null)?;
        let span = operand.span().start..self.stream.previous_span().end;
        Ok(Expression::IsNull {
            operand: Box::new(operand),
            negated,
            span,
        })
    }

    // ========================================================================
    // Prefix
    // ========================================================================

    fn prefix_expression(&mut self) -> ParseResult<Expression> {
        let start = self.stream.current().span.start;
        let (operator, r_bp) = match self.stream.current_kind() {
            TokenKind::Keyword(Keyword::Not) => (UnaryOperator::Not, bp::NOT_PREFIX),
            TokenKind::Minus => (UnaryOperator::Negate, bp::UNARY),
            TokenKind::Plus => (UnaryOperator::Plus, bp::UNARY),
            _ => return self.primary_expression(),
        };
        self.stream.advance();

        if operator == UnaryOperator::Negate {
            if let Some(literal) = self.negated_minimum_integer(start) {
                return Ok(literal);
            }
        }

        let operand = self.expression_bp(r_bp)?;
        let span = start..operand.span().end;
        Ok(Expression::Unary(operator, Box::new(operand), span))
    }

    /// `-9223372036854775808` only fits as a whole, not as the negation of
    /// an out-of-range positive literal.
    fn negated_minimum_integer(&mut self, start: usize) -> Option<Expression> {
        let TokenKind::Integer(text) = self.stream.current_kind() else {
            return None;
        };
        if parse_unsigned(text) != Some(i64::MIN.unsigned_abs()) {
            return None;
        }
        let end = self.stream.advance().end;
        Some(Expression::Literal(Literal::Integer(i64::MIN), start..end))
    }

    // ========================================================================
    // Postfix
    // ========================================================================

    fn at_postfix(&self) -> bool {
        matches!(
            self.stream.current_kind(),
            TokenKind::Dot | TokenKind::LBracket | TokenKind::Colon
        )
    }

    fn postfix(&mut self, lhs: Expression) -> ParseResult<Expression> {
        let start = lhs.span().start;
        match self.stream.current_kind() {
            TokenKind::Dot => {
                self.stream.advance();
                let key = self.symbolic_name("a property name")?;
                let span = start..key.span.end;
                Ok(Expression::Property(Box::new(lhs), key, span))
            }
            TokenKind::Colon => {
                let labels = self.labels()?;
                Ok(Expression::HasLabels(
                    Box::new(lhs),
                    labels,
                    self.stream.span_from(start),
                ))
            }
            _ => {
                self.stream.expect(TokenKind::LBracket)?;
                let from = if self.stream.check(&TokenKind::DotDot) {
                    None
                } else {
                    Some(Box::new(self.expression()?))
                };
                let expression = if self.stream.consume(&TokenKind::DotDot) {
                    let to = if self.stream.check(&TokenKind::RBracket) {
                        None
                    } else {
                        Some(Box::new(self.expression()?))
                    };
                    self.stream.expect(TokenKind::RBracket)?;
                    Expression::Slice(Box::new(lhs), from, to, self.stream.span_from(start))
                } else {
                    self.stream.expect(TokenKind::RBracket)?;
                    match from {
                        Some(index) => {
                            Expression::Index(Box::new(lhs), index, self.stream.span_from(start))
                        }
                        None => return Err(self.stream.expected("an index")),
                    }
                };
                Ok(expression)
            }
        }
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    pub(super) fn primary_expression(&mut self) -> ParseResult<Expression> {
        let token = self.stream.current().clone();
        let span = token.span.clone();
        let literal = match &token.kind {
            TokenKind::Integer(text) => {
                let value = parse_unsigned(text)
                    .and_then(|value| i64::try_from(value).ok())
                    .ok_or_else(|| integer_out_of_range(&token))?;
                Literal::Integer(value)
            }
            // A malformed number was already reported by the lexer.
            TokenKind::Float(text) => Literal::Float(text.parse().unwrap_or(f64::NAN)),
            TokenKind::String(value) => Literal::String(value.clone()),
            TokenKind::Keyword(Keyword::True) => Literal::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Literal::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            TokenKind::Parameter(name) => {
                self.stream.advance();
                return Ok(Expression::Parameter(name.clone(), span));
            }
            TokenKind::LParen if self.at_pattern_predicate() => {
                let part = self.pattern_part()?;
                return Ok(Expression::PatternPredicate(Box::new(part)));
            }
            TokenKind::LParen => {
                self.stream.advance();
                let inner = self.expression()?;
                self.stream.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.list_expression(),
            TokenKind::LBrace => return self.map_literal(),
            TokenKind::Keyword(Keyword::Case) => return self.case_expression(),
            TokenKind::Keyword(Keyword::Exists) => return self.exists_expression(),
            TokenKind::Keyword(Keyword::All) if self.at_function_call() => {
                return self.function_call();
            }
            TokenKind::Identifier(name) => {
                if self.at_function_call() {
                    return self.function_call();
                }
                if name.eq_ignore_ascii_case("exists")
                    && self.stream.peek_kind(1) == &TokenKind::LBrace
                {
                    return Err(self.unsupported("EXISTS subqueries"));
                }
                self.stream.advance();
                return Ok(Expression::Variable(name.clone(), span));
            }
            TokenKind::QuotedIdentifier(name) => {
                self.stream.advance();
                return Ok(Expression::Variable(name.clone(), span));
            }
            _ => return Err(self.stream.expected("an expression")),
        };
        self.stream.advance();
        Ok(Expression::Literal(literal, span))
    }

    /// `[a, b]` or `[x IN list WHERE pred | projection]`
    fn list_expression(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect(TokenKind::LBracket)?.start;
        if self.at_variable() && self.stream.peek_kind(1) == &TokenKind::Keyword(Keyword::In) {
            let comprehension = self.comprehension(start, TokenKind::RBracket, true)?;
            return Ok(Expression::ListComprehension(comprehension));
        }
        let items = self.expression_list(&TokenKind::RBracket)?;
        self.stream.expect(TokenKind::RBracket)?;
        Ok(Expression::List(items, self.stream.span_from(start)))
    }

    /// `x IN list [WHERE pred] [| projection]` followed by `close`.
    fn comprehension(
        &mut self,
        start: usize,
        close: TokenKind,
        allow_projection: bool,
    ) -> ParseResult<ListComprehension> {
        let variable = self.variable()?;
        self.stream.expect_keyword(Keyword::In)?;
        let list = Box::new(self.expression()?);
        let predicate = if self.stream.consume_keyword(Keyword::Where) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        let projection = if allow_projection && self.stream.consume(&TokenKind::Pipe) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.stream.expect(close)?;
        Ok(ListComprehension {
            variable,
            list,
            predicate,
            projection,
            span: self.stream.span_from(start),
        })
    }

    /// `{key: value, ...}`
    pub(super) fn map_literal(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect(TokenKind::LBrace)?.start;
        let mut entries = Vec::new();
        if !self.stream.check(&TokenKind::RBrace) {
            loop {
                let key = self.symbolic_name("a map key")?;
                self.stream.expect(TokenKind::Colon)?;
                let value = self.expression()?;
                entries.push(MapEntry { key, value });
                if !self.stream.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.stream.expect(TokenKind::RBrace)?;
        Ok(Expression::Map(entries, self.stream.span_from(start)))
    }

    fn case_expression(&mut self) -> ParseResult<Expression> {
        let start = self.stream.advance().start;
        let operand = if self.stream.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.expression()?))
        };

        let mut alternatives = Vec::new();
        while self.stream.consume_keyword(Keyword::When) {
            let when = self.expression()?;
            self.stream.expect_keyword(Keyword::Then)?;
            let then = self.expression()?;
            alternatives.push(CaseAlternative { when, then });
        }
        if alternatives.is_empty() {
            return Err(self.stream.expected("WHEN"));
        }

        let default = if self.stream.consume_keyword(Keyword::Else) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.stream.expect_keyword(Keyword::End)?;

        Ok(Expression::Case(CaseExpression {
            operand,
            alternatives,
            default,
            span: self.stream.span_from(start),
        }))
    }

    /// True when the current name (possibly namespaced) is followed by `(`.
    fn at_function_call(&self) -> bool {
        let mut offset = 1;
        loop {
            match self.stream.peek_kind(offset) {
                TokenKind::LParen => return true,
                TokenKind::Dot
                    if matches!(
                        self.stream.peek_kind(offset + 1),
                        TokenKind::Identifier(_) | TokenKind::Keyword(_)
                    ) =>
                {
                    offset += 2;
                }
                _ => return false,
            }
        }
    }

    /// `name(args)`, `count(*)`, `f(DISTINCT x)` or `all(x IN list WHERE p)`.
    fn function_call(&mut self) -> ParseResult<Expression> {
        let name = self.qualified_name("a function name")?;
        let start = name.span.start;
        self.stream.expect(TokenKind::LParen)?;

        if let Some(quantifier) = Quantifier::from_name(&name.node) {
            if self.at_variable()
                && self.stream.peek_kind(1) == &TokenKind::Keyword(Keyword::In)
            {
                let comprehension = self.comprehension(start, TokenKind::RParen, false)?;
                return Ok(Expression::Quantified(quantifier, comprehension));
            }
        }

        if name.node.eq_ignore_ascii_case("count")
            && self.stream.check(&TokenKind::Star)
            && self.stream.peek_kind(1) == &TokenKind::RParen
        {
            self.stream.advance();
            self.stream.advance();
            return Ok(Expression::CountStar(self.stream.span_from(start)));
        }

        let distinct = self.stream.consume_keyword(Keyword::Distinct);
        let arguments = self.expression_list(&TokenKind::RParen)?;
        self.stream.expect(TokenKind::RParen)?;
        Ok(Expression::FunctionCall(FunctionCall {
            name: name.node,
            distinct,
            arguments,
            span: self.stream.span_from(start),
        }))
    }

    /// `EXISTS { query }`, `EXISTS { pattern [WHERE pred] }` or the
    /// function form `exists(expr)`.
    fn exists_expression(&mut self) -> ParseResult<Expression> {
        match self.stream.peek_kind(1) {
            TokenKind::LParen => self.function_call(),
            TokenKind::LBrace => {
                if !self.rules.subqueries {
                    return Err(self.unsupported("EXISTS subqueries"));
                }
                let start = self.stream.advance().start;
                self.stream.advance();
                let body = self.nested(Self::exists_body)?;
                self.stream.expect(TokenKind::RBrace)?;
                Ok(Expression::Exists(ExistsSubquery {
                    body: Box::new(body),
                    span: self.stream.span_from(start),
                }))
            }
            _ => {
                self.stream.advance();
                Err(self.stream.expected("`{` or `(` after EXISTS"))
            }
        }
    }

    fn exists_body(&mut self) -> ParseResult<Query> {
        if self.at_clause_start() {
            return self.query(ScopeKind::Subquery);
        }
        self.scopes.push(ScopeKind::Subquery);
        let body = self.exists_pattern_body();
        self.scopes.pop();
        body
    }

    /// The short form: an implicit MATCH with an optional WHERE.
    fn exists_pattern_body(&mut self) -> ParseResult<Query> {
        let start = self.stream.current().span.start;
        let pattern = self.pattern()?;
        let mut clauses = vec![Clause::Match(MatchClause {
            optional: false,
            span: pattern.span.clone(),
            pattern,
        })];
        if self.stream.check_keyword(Keyword::Where) {
            clauses.push(self.where_clause()?);
        }
        for clause in &clauses {
            self.scopes.record_clause(clause.kind());
        }
        Ok(Query {
            clauses,
            unions: Vec::new(),
            span: self.stream.span_from(start),
        })
    }

    // ========================================================================
    // Lists and names
    // ========================================================================

    /// Comma-separated expressions up to (not including) `close`; empty when
    /// `close` follows immediately.
    pub(super) fn expression_list(&mut self, close: &TokenKind) -> ParseResult<Vec<Expression>> {
        let mut items = Vec::new();
        if self.stream.check(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if !self.stream.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    pub(super) fn at_variable(&self) -> bool {
        matches!(
            self.stream.current_kind(),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        )
    }

    pub(super) fn variable(&mut self) -> ParseResult<Ident> {
        match self.stream.current_kind() {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => {
                let name = name.clone();
                let span = self.stream.advance();
                Ok(Ident::new(name, span))
            }
            _ => Err(self.stream.expected("a variable name")),
        }
    }

    /// A label, relationship type, property key or map key. Keywords are
    /// accepted here and keep their source spelling.
    pub(super) fn symbolic_name(&mut self, what: &str) -> ParseResult<Ident> {
        let token = self.stream.current();
        let name = match &token.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => name.clone(),
            TokenKind::Keyword(_) => token.lexeme.clone(),
            _ => return Err(self.stream.expected(what)),
        };
        let span = self.stream.advance();
        Ok(Ident::new(name, span))
    }

    /// `name` or `name.space.name`, joined with `.`.
    pub(super) fn qualified_name(&mut self, what: &str) -> ParseResult<Ident> {
        let first = self.symbolic_name(what)?;
        let start = first.span.start;
        let mut name = first.node.to_string();
        while self.stream.check(&TokenKind::Dot)
            && matches!(
                self.stream.peek_kind(1),
                TokenKind::Identifier(_) | TokenKind::Keyword(_)
            )
        {
            self.stream.advance();
            let part = self.symbolic_name(what)?;
            name.push('.');
            name.push_str(&part.node);
        }
        Ok(Ident::new(name.into(), self.stream.span_from(start)))
    }
}

fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Expression {
    let span = lhs.span().start..rhs.span().end;
    Expression::Binary(op, Box::new(lhs), Box::new(rhs), span)
}

/// Parses decimal, `0x` hexadecimal and `0o` octal integer text.
pub(super) fn parse_unsigned(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(octal) = text.strip_prefix("0o") {
        u64::from_str_radix(octal, 8).ok()
    } else {
        text.parse().ok()
    }
}

fn integer_out_of_range(token: &Token) -> ParseError {
    Box::new(
        Diag::error(format!(
            "integer literal `{}` does not fit in a signed 64-bit integer",
            token.lexeme
        ))
        .with_primary_label(token.span.clone(), "out of range")
        .with_code(DiagCode::IntegerOutOfRange),
    )
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::diag::{DiagCode, DiagnosticSink};
    use crate::dialect::Dialect;
    use crate::lexer::Lexer;
    use crate::options::CypherParseOptions;
    use crate::parser::parse_tokens;
    use pretty_assertions::assert_eq;

    fn try_parse(source: &str, dialect: Dialect) -> Result<Expression, DiagnosticSink> {
        let full = format!("RETURN {source}");
        let options = CypherParseOptions::default().with_dialect(dialect);
        let tokens = Lexer::new(&full, dialect).tokenize().tokens;
        let mut sink = DiagnosticSink::new();
        let Some(document) = parse_tokens(tokens, &options, &mut sink) else {
            return Err(sink);
        };
        let query = document.statements[0].as_query().unwrap();
        match &query.clauses[0] {
            Clause::Return(ret) => Ok(ret.projection.items[0].expression.clone()),
            other => panic!("expected RETURN, got {other:?}"),
        }
    }

    fn expr(source: &str) -> Expression {
        try_parse(source, Dialect::OpenCypher).unwrap()
    }

    fn int(value: i64, span: Span) -> Expression {
        Expression::Literal(Literal::Integer(value), span)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // RETURN 1 + 2 * 3
        //        7   11  15
        let expected = Expression::Binary(
            BinaryOperator::Add,
            Box::new(int(1, 7..8)),
            Box::new(Expression::Binary(
                BinaryOperator::Multiply,
                Box::new(int(2, 11..12)),
                Box::new(int(3, 15..16)),
                11..16,
            )),
            7..16,
        );
        assert_eq!(expr("1 + 2 * 3"), expected);
    }

    #[test]
    fn subtraction_is_left_associative() {
        let Expression::Binary(BinaryOperator::Subtract, lhs, rhs, _) = expr("5 - 3 - 1") else {
            panic!("expected subtraction");
        };
        assert!(matches!(*lhs, Expression::Binary(BinaryOperator::Subtract, ..)));
        assert_eq!(*rhs, int(1, 15..16));
    }

    #[test]
    fn boolean_operator_precedence() {
        let Expression::Binary(BinaryOperator::Or, _, rhs, _) = expr("a OR b XOR c AND NOT d")
        else {
            panic!("expected OR at the root");
        };
        let Expression::Binary(BinaryOperator::Xor, _, rhs, _) = *rhs else {
            panic!("expected XOR");
        };
        let Expression::Binary(BinaryOperator::And, _, rhs, _) = *rhs else {
            panic!("expected AND");
        };
        assert!(matches!(*rhs, Expression::Unary(UnaryOperator::Not, ..)));
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let Expression::Unary(UnaryOperator::Not, operand, span) = expr("NOT a = b") else {
            panic!("expected NOT");
        };
        assert!(matches!(*operand, Expression::Binary(BinaryOperator::Eq, ..)));
        assert_eq!(span, 7..16);
    }

    #[test]
    fn comparisons_chain_with_and() {
        let Expression::Binary(BinaryOperator::And, lhs, rhs, span) = expr("1 < x <= 3") else {
            panic!("expected chained comparison");
        };
        assert!(matches!(*lhs, Expression::Binary(BinaryOperator::Lt, ..)));
        let Expression::Binary(BinaryOperator::LtEq, middle, _, _) = *rhs else {
            panic!("expected <=");
        };
        assert_eq!(middle.as_variable().map(|v| v.as_str()), Some("x"));
        assert_eq!(span, 7..17);
    }

    #[test]
    fn string_and_list_predicates() {
        let cases = [
            ("n STARTS WITH 'a'", BinaryOperator::StartsWith),
            ("n ENDS WITH 'a'", BinaryOperator::EndsWith),
            ("n CONTAINS 'a'", BinaryOperator::Contains),
            ("n =~ 'a.*'", BinaryOperator::RegexMatch),
            ("n IN [1, 2]", BinaryOperator::In),
        ];
        for (source, op) in cases {
            let Expression::Binary(actual, ..) = expr(source) else {
                panic!("expected a binary expression for {source}");
            };
            assert_eq!(actual, op, "{source}");
        }
    }

    #[test]
    fn is_not_null_wraps_property() {
        let Expression::IsNull {
            operand, negated, ..
        } = expr("n.name IS NOT NULL")
        else {
            panic!("expected IS NOT NULL");
        };
        assert!(negated);
        assert!(matches!(*operand, Expression::Property(..)));
    }

    #[test]
    fn postfix_chain() {
        let Expression::Slice(base, from, to, _) = expr("n.list[1][0..2]") else {
            panic!("expected slice");
        };
        assert!(matches!(*base, Expression::Index(..)));
        assert!(from.is_some());
        assert!(to.is_some());
        assert!(matches!(expr("n:Person:Admin"), Expression::HasLabels(_, ref l, _) if l.len() == 2));
    }

    #[test]
    fn functions_and_count_star() {
        let Expression::FunctionCall(call) = expr("apoc.text.join(DISTINCT n.names, ',')") else {
            panic!("expected function call");
        };
        assert_eq!(call.name, "apoc.text.join");
        assert!(call.distinct);
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(expr("count(*)"), Expression::CountStar(7..15));
        assert!(matches!(expr("count(n)"), Expression::FunctionCall(_)));
    }

    #[test]
    fn quantifiers_and_comprehensions() {
        assert!(matches!(
            expr("all(x IN xs WHERE x > 0)"),
            Expression::Quantified(Quantifier::All, _)
        ));
        assert!(matches!(
            expr("none(x IN xs WHERE x > 0)"),
            Expression::Quantified(Quantifier::None, _)
        ));
        let Expression::ListComprehension(comprehension) = expr("[x IN range(1, 10) WHERE x % 2 = 0 | x * x]")
        else {
            panic!("expected list comprehension");
        };
        assert_eq!(comprehension.variable.node, "x");
        assert!(comprehension.predicate.is_some());
        assert!(comprehension.projection.is_some());
        assert_eq!(comprehension.span, 7..50);
    }

    #[test]
    fn case_forms() {
        let Expression::Case(simple) = expr("CASE n.x WHEN 1 THEN 'one' ELSE 'many' END") else {
            panic!("expected CASE");
        };
        assert!(simple.operand.is_some());
        assert!(simple.default.is_some());
        let Expression::Case(generic) = expr("CASE WHEN a THEN 1 WHEN b THEN 2 END") else {
            panic!("expected CASE");
        };
        assert!(generic.operand.is_none());
        assert_eq!(generic.alternatives.len(), 2);
    }

    #[test]
    fn literals() {
        assert_eq!(expr("0x1F"), int(31, 7..11));
        assert_eq!(expr("0o17"), int(15, 7..11));
        assert_eq!(
            expr("-9223372036854775808"),
            Expression::Literal(Literal::Integer(i64::MIN), 7..27)
        );
        assert_eq!(
            expr("1.5e3"),
            Expression::Literal(Literal::Float(1500.0), 7..12)
        );
        assert_eq!(
            expr("'it\\'s'"),
            Expression::Literal(Literal::String("it's".into()), 7..14)
        );
        assert!(matches!(expr("$param"), Expression::Parameter(ref name, _) if name == "param"));
        assert!(matches!(expr("{a: 1, `b c`: [true, null]}"), Expression::Map(ref e, _) if e.len() == 2));
    }

    #[test]
    fn integer_overflow_is_reported() {
        let sink = try_parse("9223372036854775808", Dialect::OpenCypher).unwrap_err();
        assert_eq!(sink.count_code(DiagCode::IntegerOutOfRange), 1);
    }

    #[test]
    fn relationship_patterns_are_predicates() {
        // RETURN (n)-[:KNOWS]->()
        //        7               23
        let Expression::PatternPredicate(part) = expr("(n)-[:KNOWS]->()") else {
            panic!("expected a pattern predicate");
        };
        assert_eq!(part.span, 7..23);
        assert_eq!(part.start.variable.as_ref().unwrap().node, "n");
        assert_eq!(part.chain.len(), 1);
        assert_eq!(part.chain[0].relationship.types[0].node, "KNOWS");

        let Expression::Unary(UnaryOperator::Not, operand, span) = expr("NOT (n)-->(:X)") else {
            panic!("expected NOT");
        };
        assert!(matches!(*operand, Expression::PatternPredicate(_)));
        assert_eq!(span, 7..21);

        let predicate = expr("(a)<-[:R*1..2]-(b:L {k: (1)})--()");
        let Expression::PatternPredicate(part) = predicate else {
            panic!("expected a pattern predicate, got {predicate:?}");
        };
        assert_eq!(part.chain.len(), 2);
    }

    #[test]
    fn exists_accepts_a_pattern_argument() {
        for dialect in [Dialect::OpenCypher, Dialect::Neo4j5] {
            let Expression::FunctionCall(call) = try_parse("exists((n)-->())", dialect).unwrap()
            else {
                panic!("expected exists()");
            };
            assert!(matches!(call.arguments.as_slice(), [Expression::PatternPredicate(_)]));
        }
    }

    #[test]
    fn parenthesized_expressions_are_not_patterns() {
        assert!(matches!(expr("(n)"), Expression::Variable(..)));
        assert!(matches!(
            expr("(n) - 1"),
            Expression::Binary(BinaryOperator::Subtract, ..)
        ));
        assert!(matches!(
            expr("(n.x) - (m.y)"),
            Expression::Binary(BinaryOperator::Subtract, ..)
        ));
        assert!(matches!(
            expr("(n) < -1"),
            Expression::Binary(BinaryOperator::Lt, ..)
        ));
    }

    #[test]
    fn exists_forms_depend_on_dialect() {
        let sink = try_parse("exists { MATCH (n) }", Dialect::OpenCypher).unwrap_err();
        assert_eq!(sink.count_code(DiagCode::UnsupportedInDialect), 1);

        assert!(matches!(
            try_parse("exists(n.name)", Dialect::OpenCypher).unwrap(),
            Expression::FunctionCall(_)
        ));

        let Expression::Exists(exists) =
            try_parse("EXISTS { (n)-->(m) WHERE m.x > 1 }", Dialect::Neo4j5).unwrap()
        else {
            panic!("expected EXISTS subquery");
        };
        let kinds: Vec<ClauseKind> = exists.body.clauses.iter().map(Clause::kind).collect();
        assert_eq!(kinds, [ClauseKind::Match, ClauseKind::Where]);
        assert_eq!(exists.span, 7..41);
    }
}
