//! Documents, statements, UNION and the clause loop.

use crate::ast::{Clause, ClauseKind, Document, ErrorNode, Query, Statement, UnionBranch};
use crate::diag::{Diag, DiagCode};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ParseError, ParseResult, Parser};
use crate::semantic::ScopeKind;

impl Parser<'_> {
    /// Parses `;`-separated statements up to the end of input.
    pub(super) fn document(&mut self) -> ParseResult<Document> {
        let mut statements = Vec::new();
        loop {
            while self.stream.consume(&TokenKind::Semicolon) {}
            if self.stream.is_at_end() {
                break;
            }
            statements.push(self.statement()?);
        }
        Ok(Document {
            statements,
            span: 0..self.stream.current().span.end,
        })
    }

    fn statement(&mut self) -> ParseResult<Statement> {
        let recognized = self.at_clause_start();
        let query = self.query(ScopeKind::Statement)?;
        let only_errors = query
            .clauses
            .iter()
            .all(|clause| matches!(clause, Clause::Error(_)));
        if !recognized && only_errors && query.unions.is_empty() {
            return Ok(Statement::Error(ErrorNode { span: query.span }));
        }
        Ok(Statement::Query(query))
    }

    /// Parses a clause sequence and any UNION branches following it.
    ///
    /// Each branch gets its own scope frame of the given kind.
    pub(super) fn query(&mut self, kind: ScopeKind) -> ParseResult<Query> {
        let start = self.stream.current().span.start;
        let clauses = self.branch(kind)?;
        if clauses.is_empty() {
            let diag = self.missing_clause("at the start of a query");
            self.report(diag)?;
        }

        let mut unions = Vec::new();
        while self.stream.check_keyword(Keyword::Union) {
            let union_start = self.stream.advance().start;
            let all = self.stream.consume_keyword(Keyword::All);
            let clauses = self.branch(kind)?;
            if clauses.is_empty() {
                let diag = self.missing_clause("after UNION");
                self.report(diag)?;
            }
            unions.push(UnionBranch {
                all,
                clauses,
                span: self.stream.span_from(union_start),
            });
        }

        Ok(Query {
            clauses,
            unions,
            span: self.stream.span_from(start),
        })
    }

    fn branch(&mut self, kind: ScopeKind) -> ParseResult<Vec<Clause>> {
        self.scopes.push(kind);
        let clauses = self.clauses();
        self.scopes.pop();
        clauses
    }

    /// The clause loop: parses clauses until the end of the sequence.
    ///
    /// In recovery mode a failed clause is replaced by [`Clause::Error`]
    /// and parsing resumes at the next synchronization point.
    fn clauses(&mut self) -> ParseResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        while !self.at_sequence_end() {
            let start = self.stream.current().span.start;
            let start_pos = self.stream.position();
            match self.clause() {
                Ok(clause) => {
                    self.scopes.record_clause(clause.kind());
                    clauses.push(clause);
                }
                Err(diag) if self.recover => {
                    self.sink.push(*diag);
                    let error = self.recover_clause(start, start_pos);
                    self.scopes.record_clause(ClauseKind::Error);
                    clauses.push(Clause::Error(error));
                }
                Err(diag) => return Err(diag),
            }
        }
        Ok(clauses)
    }

    fn missing_clause(&self, context: &str) -> ParseError {
        let token = self.stream.current();
        Box::new(
            Diag::error(format!("expected a clause {context}, found {}", token.kind))
                .with_primary_label(token.span.clone(), "expected a clause here")
                .with_code(DiagCode::InvalidClauseComposition),
        )
    }
}
