//! Graph patterns: `p = (a:Label {k: v})-[r:TYPE*1..3]->(b)`.

use crate::ast::{
    Direction, Expression, Ident, NodePattern, Pattern, PatternPart, PatternStep,
    RelationshipPattern, VariableLength,
};
use crate::diag::{Diag, DiagCode};
use crate::lexer::TokenKind;
use crate::parser::expression::parse_unsigned;
use crate::parser::{ParseResult, Parser};

impl Parser<'_> {
    /// `part {, part}`
    pub(super) fn pattern(&mut self) -> ParseResult<Pattern> {
        let start = self.stream.current().span.start;
        let mut parts = vec![self.pattern_part()?];
        while self.stream.consume(&TokenKind::Comma) {
            parts.push(self.pattern_part()?);
        }
        Ok(Pattern {
            parts,
            span: self.stream.span_from(start),
        })
    }

    /// `[variable =] node {relationship node}`
    pub(super) fn pattern_part(&mut self) -> ParseResult<PatternPart> {
        let start = self.stream.current().span.start;
        let variable = if self.at_variable() && self.stream.peek_kind(1) == &TokenKind::Eq {
            let variable = self.variable()?;
            self.stream.advance();
            Some(variable)
        } else {
            None
        };

        let start_node = self.node_pattern()?;
        let mut chain = Vec::new();
        while self.at_relationship() {
            let relationship = self.relationship_pattern()?;
            let node = self.node_pattern()?;
            chain.push(PatternStep { relationship, node });
        }

        Ok(PatternPart {
            variable,
            start: start_node,
            chain,
            span: self.stream.span_from(start),
        })
    }

    /// True when the `(` at the current token opens a node pattern that is
    /// followed by a relationship and another node, which makes it a pattern
    /// predicate rather than a parenthesized expression.
    pub(super) fn at_pattern_predicate(&self) -> bool {
        let Some(mut offset) = self.node_pattern_end(0) else {
            return false;
        };
        let peek = |offset: usize| self.stream.peek_kind(offset);
        if peek(offset) == &TokenKind::Lt {
            offset += 1;
        }
        if peek(offset) != &TokenKind::Minus {
            return false;
        }
        offset += 1;
        match peek(offset) {
            TokenKind::Minus => offset += 1,
            TokenKind::LBracket => {
                let Some(close) = self.matching_close(offset) else {
                    return false;
                };
                if peek(close + 1) != &TokenKind::Minus {
                    return false;
                }
                offset = close + 2;
            }
            _ => return false,
        }
        if peek(offset) == &TokenKind::Gt {
            offset += 1;
        }
        peek(offset) == &TokenKind::LParen
    }

    /// Offset just past a node pattern starting at `offset`, judged by its
    /// first tokens: `()`, `(n)`, `(:L ...)`, `(n:L ...)`, `(n {..})`.
    fn node_pattern_end(&self, offset: usize) -> Option<usize> {
        let peek = |offset: usize| self.stream.peek_kind(offset);
        if peek(offset) != &TokenKind::LParen {
            return None;
        }
        let mut inner = offset + 1;
        if matches!(
            peek(inner),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        ) {
            inner += 1;
        }
        match peek(inner) {
            TokenKind::RParen
            | TokenKind::Colon
            | TokenKind::LBrace
            | TokenKind::Parameter(_) => self.matching_close(offset).map(|close| close + 1),
            _ => None,
        }
    }

    /// Offset of the bracket closing the one at `offset`, skipping nested
    /// brackets of every kind.
    fn matching_close(&self, offset: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut index = offset;
        loop {
            match self.stream.peek_kind(index) {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            index += 1;
        }
    }

    fn at_relationship(&self) -> bool {
        match self.stream.current_kind() {
            TokenKind::Minus => true,
            TokenKind::Lt => self.stream.peek_kind(1) == &TokenKind::Minus,
            _ => false,
        }
    }

    /// `( [variable] {:Label} [properties] )`
    fn node_pattern(&mut self) -> ParseResult<NodePattern> {
        let start = self.stream.expect(TokenKind::LParen)?.start;
        let variable = if self.at_variable() {
            Some(self.variable()?)
        } else {
            None
        };
        let labels = if self.stream.check(&TokenKind::Colon) {
            self.labels()?
        } else {
            Vec::new()
        };
        let properties = self.pattern_properties()?;
        self.stream.expect(TokenKind::RParen)?;
        Ok(NodePattern {
            variable,
            labels,
            properties,
            span: self.stream.span_from(start),
        })
    }

    /// `:A:B`, one or more labels each introduced by a colon.
    pub(super) fn labels(&mut self) -> ParseResult<Vec<Ident>> {
        let mut labels = Vec::new();
        while self.stream.consume(&TokenKind::Colon) {
            labels.push(self.symbolic_name("a label name")?);
        }
        if labels.is_empty() {
            return Err(self.stream.expected("`:`"));
        }
        Ok(labels)
    }

    fn pattern_properties(&mut self) -> ParseResult<Option<Expression>> {
        match self.stream.current_kind() {
            TokenKind::LBrace => Ok(Some(self.map_literal()?)),
            TokenKind::Parameter(_) => Ok(Some(self.primary_expression()?)),
            _ => Ok(None),
        }
    }

    /// `-[...]->`, `<-[...]-`, `-[...]-` or `<-[...]->`, with the bracketed
    /// detail optional.
    fn relationship_pattern(&mut self) -> ParseResult<RelationshipPattern> {
        let start = self.stream.current().span.start;
        let left = self.stream.consume(&TokenKind::Lt);
        self.stream.expect(TokenKind::Minus)?;

        let mut variable = None;
        let mut types = Vec::new();
        let mut length = None;
        let mut properties = None;
        if self.stream.consume(&TokenKind::LBracket) {
            if self.at_variable() {
                variable = Some(self.variable()?);
            }
            if self.stream.consume(&TokenKind::Colon) {
                types.push(self.symbolic_name("a relationship type")?);
                while self.stream.consume(&TokenKind::Pipe) {
                    self.stream.consume(&TokenKind::Colon);
                    types.push(self.symbolic_name("a relationship type")?);
                }
            }
            if self.stream.consume(&TokenKind::Star) {
                length = Some(self.variable_length()?);
            }
            properties = self.pattern_properties()?;
            self.stream.expect(TokenKind::RBracket)?;
        }

        self.stream.expect(TokenKind::Minus)?;
        let right = self.stream.consume(&TokenKind::Gt);
        let direction = match (left, right) {
            (true, false) => Direction::Left,
            (false, true) => Direction::Right,
            _ => Direction::Undirected,
        };

        Ok(RelationshipPattern {
            direction,
            variable,
            types,
            length,
            properties,
            span: self.stream.span_from(start),
        })
    }

    /// The range after `*`: nothing, `n`, `n..`, `..m` or `n..m`.
    fn variable_length(&mut self) -> ParseResult<VariableLength> {
        let min = self.range_bound()?;
        if self.stream.consume(&TokenKind::DotDot) {
            let max = self.range_bound()?;
            Ok(VariableLength { min, max })
        } else {
            Ok(VariableLength { min, max: min })
        }
    }

    fn range_bound(&mut self) -> ParseResult<Option<u64>> {
        let TokenKind::Integer(text) = self.stream.current_kind() else {
            return Ok(None);
        };
        let Some(value) = parse_unsigned(text) else {
            let token = self.stream.current();
            return Err(Box::new(
                Diag::error(format!("range bound `{}` does not fit in 64 bits", token.lexeme))
                    .with_primary_label(token.span.clone(), "out of range")
                    .with_code(DiagCode::IntegerOutOfRange),
            ));
        };
        self.stream.advance();
        Ok(Some(value))
    }
}
