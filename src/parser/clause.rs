//! Per-clause sub-parsers.
//!
//! [`Parser::clause`] dispatches on the clause keyword at the current token.
//! Each sub-parser consumes its keyword first, so a failing clause has
//! always made progress by the time recovery starts.

use crate::ast::{
    CallBody, CallClause, Clause, CreateClause, DeleteClause, Expression, MatchClause,
    MergeAction, MergeActionKind, MergeClause, ProcedureCall, Projection, ProjectionItem,
    RemoveClause, RemoveItem, ReturnClause, SetClause, SetItem, SortItem, UnwindClause,
    WhereClause, WithClause, YieldItem,
};
use crate::diag::{Diag, DiagCode};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ParseError, ParseResult, Parser};
use crate::semantic::ScopeKind;

impl Parser<'_> {
    pub(super) fn clause(&mut self) -> ParseResult<Clause> {
        let keyword = match self.stream.current_kind() {
            TokenKind::Keyword(keyword) => *keyword,
            _ => return Err(self.not_a_clause()),
        };
        match keyword {
            Keyword::Match | Keyword::Optional => self.match_clause(),
            Keyword::Where => self.where_clause(),
            Keyword::With => self.with_clause(),
            Keyword::Return => self.return_clause(),
            Keyword::Unwind => self.unwind_clause(),
            Keyword::Create => self.create_clause(),
            Keyword::Merge => self.merge_clause(),
            Keyword::Delete | Keyword::Detach => self.delete_clause(),
            Keyword::Set => self.set_clause(),
            Keyword::Remove => self.remove_clause(),
            Keyword::Call => self.call_clause(),
            _ => Err(self.not_a_clause()),
        }
    }

    fn not_a_clause(&self) -> ParseError {
        let found = &self.stream.current().kind;
        self.stream.error_here(format!(
            "unexpected {found}, expected a clause such as MATCH or RETURN"
        ))
    }

    // ========================================================================
    // Reading clauses
    // ========================================================================

    /// `[OPTIONAL] MATCH pattern`
    fn match_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.current().span.start;
        let optional = self.stream.consume_keyword(Keyword::Optional);
        self.stream.expect_keyword(Keyword::Match)?;
        let pattern = self.pattern()?;
        Ok(Clause::Match(MatchClause {
            optional,
            pattern,
            span: self.stream.span_from(start),
        }))
    }

    /// `WHERE expression`
    pub(super) fn where_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let predicate = self.expression()?;
        Ok(Clause::Where(WhereClause {
            predicate,
            span: self.stream.span_from(start),
        }))
    }

    /// `UNWIND expression AS variable`
    fn unwind_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let expression = self.expression()?;
        self.stream.expect_keyword(Keyword::As)?;
        let variable = self.variable()?;
        Ok(Clause::Unwind(UnwindClause {
            expression,
            variable,
            span: self.stream.span_from(start),
        }))
    }

    /// `CALL { query }` or `CALL name.space(args) [YIELD ...]`
    fn call_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let body = if self.stream.check(&TokenKind::LBrace) {
            if !self.rules.subqueries {
                return Err(self.unsupported("CALL subqueries"));
            }
            self.stream.advance();
            let body = self.nested(|parser| parser.query(ScopeKind::Subquery))?;
            self.stream.expect(TokenKind::RBrace)?;
            CallBody::Subquery(Box::new(body))
        } else {
            CallBody::Procedure(self.procedure_call()?)
        };
        Ok(Clause::Call(CallClause {
            body,
            span: self.stream.span_from(start),
        }))
    }

    fn procedure_call(&mut self) -> ParseResult<ProcedureCall> {
        let name = self.qualified_name("a procedure name")?;
        let arguments = if self.stream.consume(&TokenKind::LParen) {
            let arguments = self.expression_list(&TokenKind::RParen)?;
            self.stream.expect(TokenKind::RParen)?;
            Some(arguments)
        } else {
            None
        };

        let mut yield_items = Vec::new();
        let mut yield_all = false;
        if self.stream.consume_keyword(Keyword::Yield) {
            if self.stream.consume(&TokenKind::Star) {
                yield_all = true;
            } else {
                loop {
                    let field = self.symbolic_name("a procedure output name")?;
                    let alias = if self.stream.consume_keyword(Keyword::As) {
                        Some(self.variable()?)
                    } else {
                        None
                    };
                    yield_items.push(YieldItem { field, alias });
                    if !self.stream.consume(&TokenKind::Comma) {
                        break;
                    }
                }
            }
        }

        Ok(ProcedureCall {
            name,
            arguments,
            yield_items,
            yield_all,
        })
    }

    // ========================================================================
    // Projections
    // ========================================================================

    fn with_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let projection = self.projection()?;
        Ok(Clause::With(WithClause {
            projection,
            span: self.stream.span_from(start),
        }))
    }

    fn return_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let projection = self.projection()?;
        Ok(Clause::Return(ReturnClause {
            projection,
            span: self.stream.span_from(start),
        }))
    }

    /// `[DISTINCT] (* | item) {, item} [ORDER BY ...] [SKIP n] [LIMIT n]`
    fn projection(&mut self) -> ParseResult<Projection> {
        let distinct = self.stream.consume_keyword(Keyword::Distinct);
        let star = self.stream.consume(&TokenKind::Star);
        let mut items = Vec::new();
        if !star || self.stream.consume(&TokenKind::Comma) {
            loop {
                items.push(self.projection_item()?);
                if !self.stream.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let mut order_by = Vec::new();
        if self.stream.consume_keyword(Keyword::Order) {
            self.stream.expect_keyword(Keyword::By)?;
            loop {
                order_by.push(self.sort_item()?);
                if !self.stream.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let skip = if self.stream.consume_keyword(Keyword::Skip) {
            Some(self.expression()?)
        } else {
            None
        };
        let limit = if self.stream.consume_keyword(Keyword::Limit) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(Projection {
            distinct,
            star,
            items,
            order_by,
            skip,
            limit,
        })
    }

    fn projection_item(&mut self) -> ParseResult<ProjectionItem> {
        let start = self.stream.current().span.start;
        let expression = self.expression()?;
        let alias = if self.stream.consume_keyword(Keyword::As) {
            Some(self.variable()?)
        } else {
            None
        };
        Ok(ProjectionItem {
            expression,
            alias,
            span: self.stream.span_from(start),
        })
    }

    fn sort_item(&mut self) -> ParseResult<SortItem> {
        let start = self.stream.current().span.start;
        let expression = self.expression()?;
        let descending = match self.stream.current_kind() {
            TokenKind::Keyword(Keyword::Desc | Keyword::Descending) => {
                self.stream.advance();
                true
            }
            TokenKind::Keyword(Keyword::Asc | Keyword::Ascending) => {
                self.stream.advance();
                false
            }
            _ => false,
        };
        Ok(SortItem {
            expression,
            descending,
            span: self.stream.span_from(start),
        })
    }

    // ========================================================================
    // Updating clauses
    // ========================================================================

    fn create_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let pattern = self.pattern()?;
        Ok(Clause::Create(CreateClause {
            pattern,
            span: self.stream.span_from(start),
        }))
    }

    /// `MERGE part {ON (CREATE | MATCH) SET items}`
    ///
    /// The actions stay inside the MERGE node.
    fn merge_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let pattern = self.pattern_part()?;
        let mut actions = Vec::new();
        while self.stream.check_keyword(Keyword::On) {
            let action_start = self.stream.advance().start;
            let kind = if self.stream.consume_keyword(Keyword::Create) {
                MergeActionKind::OnCreate
            } else if self.stream.consume_keyword(Keyword::Match) {
                MergeActionKind::OnMatch
            } else {
                return Err(self.stream.expected("CREATE or MATCH after ON"));
            };
            self.stream.expect_keyword(Keyword::Set)?;
            let items = self.set_items()?;
            actions.push(MergeAction {
                kind,
                items,
                span: self.stream.span_from(action_start),
            });
        }
        Ok(Clause::Merge(MergeClause {
            pattern,
            actions,
            span: self.stream.span_from(start),
        }))
    }

    /// `[DETACH] DELETE expression {, expression}`
    fn delete_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.current().span.start;
        let detach = self.stream.consume_keyword(Keyword::Detach);
        self.stream.expect_keyword(Keyword::Delete)?;
        let mut expressions = vec![self.expression()?];
        while self.stream.consume(&TokenKind::Comma) {
            expressions.push(self.expression()?);
        }
        Ok(Clause::Delete(DeleteClause {
            detach,
            expressions,
            span: self.stream.span_from(start),
        }))
    }

    fn set_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let items = self.set_items()?;
        Ok(Clause::Set(SetClause {
            items,
            span: self.stream.span_from(start),
        }))
    }

    fn set_items(&mut self) -> ParseResult<Vec<SetItem>> {
        let mut items = vec![self.set_item()?];
        while self.stream.consume(&TokenKind::Comma) {
            items.push(self.set_item()?);
        }
        Ok(items)
    }

    /// `n.p = e`, `n = e`, `n += e` or `n:Label`
    fn set_item(&mut self) -> ParseResult<SetItem> {
        let start = self.stream.current().span.start;
        if self.at_variable() {
            match self.stream.peek_kind(1) {
                TokenKind::Eq => {
                    let variable = self.variable()?;
                    self.stream.advance();
                    let value = self.expression()?;
                    return Ok(SetItem::Replace {
                        variable,
                        value,
                        span: self.stream.span_from(start),
                    });
                }
                TokenKind::PlusEq => {
                    let variable = self.variable()?;
                    self.stream.advance();
                    let value = self.expression()?;
                    return Ok(SetItem::Merge {
                        variable,
                        value,
                        span: self.stream.span_from(start),
                    });
                }
                TokenKind::Colon => {
                    let variable = self.variable()?;
                    let labels = self.labels()?;
                    return Ok(SetItem::Labels {
                        variable,
                        labels,
                        span: self.stream.span_from(start),
                    });
                }
                _ => {}
            }
        }

        let target = self.property_target()?;
        self.stream.expect(TokenKind::Eq)?;
        let value = self.expression()?;
        Ok(SetItem::Property {
            target,
            value,
            span: self.stream.span_from(start),
        })
    }

    fn remove_clause(&mut self) -> ParseResult<Clause> {
        let start = self.stream.advance().start;
        let mut items = vec![self.remove_item()?];
        while self.stream.consume(&TokenKind::Comma) {
            items.push(self.remove_item()?);
        }
        Ok(Clause::Remove(RemoveClause {
            items,
            span: self.stream.span_from(start),
        }))
    }

    /// `n:Label` or `n.prop`
    fn remove_item(&mut self) -> ParseResult<RemoveItem> {
        let start = self.stream.current().span.start;
        if self.at_variable() && self.stream.peek_kind(1) == &TokenKind::Colon {
            let variable = self.variable()?;
            let labels = self.labels()?;
            return Ok(RemoveItem::Labels {
                variable,
                labels,
                span: self.stream.span_from(start),
            });
        }
        Ok(RemoveItem::Property(self.property_target()?))
    }

    /// A property access used as an assignment target, such as `n.address.city`.
    fn property_target(&mut self) -> ParseResult<Expression> {
        let start = self.stream.current().span.clone();
        let target = self.postfix_expression()?;
        if matches!(target, Expression::Property(..)) {
            Ok(target)
        } else {
            Err(Box::new(
                Diag::error("expected a property such as `n.name`")
                    .with_primary_label(start.start..target.span().end, "not a property")
                    .with_code(DiagCode::ExpectedToken),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::diag::DiagnosticSink;
    use crate::dialect::Dialect;
    use crate::lexer::Lexer;
    use crate::options::CypherParseOptions;
    use crate::parser::parse_tokens;
    use pretty_assertions::assert_eq;

    fn clauses_with(source: &str, dialect: Dialect) -> Vec<Clause> {
        let options = CypherParseOptions::default().with_dialect(dialect);
        let tokens = Lexer::new(source, dialect).tokenize().tokens;
        let mut sink = DiagnosticSink::new();
        let document = parse_tokens(tokens, &options, &mut sink);
        assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.as_slice());
        match document.unwrap().statements.into_iter().next() {
            Some(Statement::Query(query)) => query.clauses,
            other => panic!("expected a query, got {other:?}"),
        }
    }

    fn clauses(source: &str) -> Vec<Clause> {
        clauses_with(source, Dialect::OpenCypher)
    }

    fn first_error(source: &str, dialect: Dialect) -> crate::diag::Diag {
        let options = CypherParseOptions::default().with_dialect(dialect);
        let tokens = Lexer::new(source, dialect).tokenize().tokens;
        let mut sink = DiagnosticSink::new();
        assert!(parse_tokens(tokens, &options, &mut sink).is_none());
        sink.into_vec().remove(0)
    }

    #[test]
    fn optional_match_is_a_match_clause() {
        let clauses = clauses("OPTIONAL MATCH (n) RETURN n");
        let Clause::Match(m) = &clauses[0] else {
            panic!("expected MATCH");
        };
        assert!(m.optional);
        assert_eq!(m.span, 0..18);
    }

    #[test]
    fn projection_with_modifiers() {
        let clauses =
            clauses("MATCH (n) RETURN DISTINCT n.name AS name, n ORDER BY name DESC, n SKIP 1 LIMIT 10");
        let Clause::Return(ret) = &clauses[1] else {
            panic!("expected RETURN");
        };
        let projection = &ret.projection;
        assert!(projection.distinct);
        assert!(!projection.star);
        assert_eq!(projection.items.len(), 2);
        assert_eq!(
            projection.items[0].alias.as_ref().map(|a| a.node.as_str()),
            Some("name")
        );
        assert_eq!(projection.order_by.len(), 2);
        assert!(projection.order_by[0].descending);
        assert!(!projection.order_by[1].descending);
        assert_eq!(
            projection.skip,
            Some(Expression::Literal(Literal::Integer(1), 71..72))
        );
        assert!(projection.limit.is_some());
    }

    #[test]
    fn star_projection_may_add_items() {
        let clauses = clauses("MATCH (n) WITH *, 1 AS one RETURN *");
        let Clause::With(with) = &clauses[1] else {
            panic!("expected WITH");
        };
        assert!(with.projection.star);
        assert_eq!(with.projection.items.len(), 1);
        let Clause::Return(ret) = &clauses[2] else {
            panic!("expected RETURN");
        };
        assert!(ret.projection.star);
        assert!(ret.projection.items.is_empty());
    }

    #[test]
    fn unwind_binds_variable() {
        let clauses = clauses("UNWIND [1, 2] AS x RETURN x");
        let Clause::Unwind(unwind) = &clauses[0] else {
            panic!("expected UNWIND");
        };
        assert_eq!(unwind.variable.node, "x");
        assert_eq!(unwind.span, 0..18);
    }

    #[test]
    fn merge_actions_stay_inside_merge() {
        let clauses = clauses(
            "MERGE (n:Person {id: 1}) ON CREATE SET n.created = 1 ON MATCH SET n.seen = n.seen + 1, n:Known RETURN n",
        );
        assert_eq!(clauses.len(), 2);
        let Clause::Merge(merge) = &clauses[0] else {
            panic!("expected MERGE");
        };
        assert_eq!(merge.actions.len(), 2);
        assert_eq!(merge.actions[0].kind, MergeActionKind::OnCreate);
        assert_eq!(merge.actions[1].kind, MergeActionKind::OnMatch);
        assert_eq!(merge.actions[1].items.len(), 2);
        assert!(matches!(merge.actions[1].items[1], SetItem::Labels { .. }));
        assert!(matches!(clauses[1], Clause::Return(_)));
    }

    #[test]
    fn set_item_forms() {
        let clauses = clauses("MATCH (n) SET n.a = 1, n = {b: 2}, n += {c: 3}, n:Tag RETURN n");
        let Clause::Set(set) = &clauses[1] else {
            panic!("expected SET");
        };
        assert!(matches!(set.items[0], SetItem::Property { .. }));
        assert!(matches!(set.items[1], SetItem::Replace { .. }));
        assert!(matches!(set.items[2], SetItem::Merge { .. }));
        assert!(matches!(set.items[3], SetItem::Labels { .. }));
    }

    #[test]
    fn set_requires_property_target() {
        let diag = first_error("MATCH (n) SET 1 = 2", Dialect::OpenCypher);
        assert_eq!(diag.message, "expected a property such as `n.name`");
    }

    #[test]
    fn remove_and_detach_delete() {
        let clauses = clauses("MATCH (n) REMOVE n.tmp, n:Old DETACH DELETE n");
        let Clause::Remove(remove) = &clauses[1] else {
            panic!("expected REMOVE");
        };
        assert!(matches!(remove.items[0], RemoveItem::Property(_)));
        assert!(matches!(remove.items[1], RemoveItem::Labels { .. }));
        let Clause::Delete(delete) = &clauses[2] else {
            panic!("expected DELETE");
        };
        assert!(delete.detach);
        assert_eq!(delete.span, 30..45);
    }

    #[test]
    fn procedure_call_with_yield() {
        let clauses = clauses("CALL db.labels() YIELD label AS l RETURN l");
        let Clause::Call(call) = &clauses[0] else {
            panic!("expected CALL");
        };
        let CallBody::Procedure(procedure) = &call.body else {
            panic!("expected procedure call");
        };
        assert_eq!(procedure.name.node, "db.labels");
        assert_eq!(procedure.arguments, Some(Vec::new()));
        assert_eq!(procedure.yield_items[0].binding().node, "l");
    }

    #[test]
    fn call_subquery_requires_neo4j5() {
        let diag = first_error("CALL { RETURN 1 } RETURN 2", Dialect::OpenCypher);
        assert_eq!(diag.code, Some(crate::diag::DiagCode::UnsupportedInDialect));
        assert_eq!(diag.span(), 5..6);

        let clauses = clauses_with(
            "CALL { MATCH (n) RETURN n AS x } RETURN x",
            Dialect::Neo4j5,
        );
        let Clause::Call(call) = &clauses[0] else {
            panic!("expected CALL");
        };
        let CallBody::Subquery(body) = &call.body else {
            panic!("expected subquery");
        };
        assert_eq!(body.clauses.len(), 2);
        assert_eq!(call.span, 0..32);
    }
}
