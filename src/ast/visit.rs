//! Immutable AST visitor.
//!
//! Override the `visit_*` methods of interest and call the matching `walk_*`
//! function to continue into children. Returning [`ControlFlow::Break`] stops
//! the traversal.

use std::ops::ControlFlow;

use crate::ast::{
    CallBody, Clause, Document, Expression, NodePattern, Pattern, PatternPart, Projection,
    ProjectionItem, Query, RelationshipPattern, RemoveItem, SetItem, Statement,
};

/// Shared type alias for visitor traversal methods.
pub type VisitResult<B> = ControlFlow<B>;

pub trait Visit {
    type Break;

    fn visit_document(&mut self, document: &Document) -> VisitResult<Self::Break> {
        walk_document(self, document)
    }

    fn visit_statement(&mut self, statement: &Statement) -> VisitResult<Self::Break> {
        walk_statement(self, statement)
    }

    fn visit_query(&mut self, query: &Query) -> VisitResult<Self::Break> {
        walk_query(self, query)
    }

    /// Entered for the body of `EXISTS { }` and `CALL { }`.
    fn visit_subquery(&mut self, body: &Query) -> VisitResult<Self::Break> {
        self.visit_query(body)
    }

    fn visit_clause(&mut self, clause: &Clause) -> VisitResult<Self::Break> {
        walk_clause(self, clause)
    }

    fn visit_pattern_part(&mut self, part: &PatternPart) -> VisitResult<Self::Break> {
        walk_pattern_part(self, part)
    }

    fn visit_node_pattern(&mut self, node: &NodePattern) -> VisitResult<Self::Break> {
        walk_node_pattern(self, node)
    }

    fn visit_relationship_pattern(
        &mut self,
        relationship: &RelationshipPattern,
    ) -> VisitResult<Self::Break> {
        walk_relationship_pattern(self, relationship)
    }

    fn visit_projection_item(&mut self, item: &ProjectionItem) -> VisitResult<Self::Break> {
        self.visit_expression(&item.expression)
    }

    fn visit_set_item(&mut self, item: &SetItem) -> VisitResult<Self::Break> {
        walk_set_item(self, item)
    }

    fn visit_expression(&mut self, expression: &Expression) -> VisitResult<Self::Break> {
        walk_expression(self, expression)
    }
}

pub fn walk_document<V: Visit + ?Sized>(
    visitor: &mut V,
    document: &Document,
) -> VisitResult<V::Break> {
    for statement in &document.statements {
        visitor.visit_statement(statement)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_statement<V: Visit + ?Sized>(
    visitor: &mut V,
    statement: &Statement,
) -> VisitResult<V::Break> {
    match statement {
        Statement::Query(query) => visitor.visit_query(query),
        Statement::Error(_) => ControlFlow::Continue(()),
    }
}

pub fn walk_query<V: Visit + ?Sized>(visitor: &mut V, query: &Query) -> VisitResult<V::Break> {
    for clauses in query.branches() {
        for clause in clauses {
            visitor.visit_clause(clause)?;
        }
    }
    ControlFlow::Continue(())
}

pub fn walk_clause<V: Visit + ?Sized>(visitor: &mut V, clause: &Clause) -> VisitResult<V::Break> {
    match clause {
        Clause::Match(c) => walk_pattern(visitor, &c.pattern),
        Clause::Create(c) => walk_pattern(visitor, &c.pattern),
        Clause::Where(c) => visitor.visit_expression(&c.predicate),
        Clause::With(c) => walk_projection(visitor, &c.projection),
        Clause::Return(c) => walk_projection(visitor, &c.projection),
        Clause::Unwind(c) => visitor.visit_expression(&c.expression),
        Clause::Merge(c) => {
            visitor.visit_pattern_part(&c.pattern)?;
            for action in &c.actions {
                for item in &action.items {
                    visitor.visit_set_item(item)?;
                }
            }
            ControlFlow::Continue(())
        }
        Clause::Delete(c) => {
            for expression in &c.expressions {
                visitor.visit_expression(expression)?;
            }
            ControlFlow::Continue(())
        }
        Clause::Set(c) => {
            for item in &c.items {
                visitor.visit_set_item(item)?;
            }
            ControlFlow::Continue(())
        }
        Clause::Remove(c) => {
            for item in &c.items {
                match item {
                    RemoveItem::Property(expression) => visitor.visit_expression(expression)?,
                    RemoveItem::Labels { .. } => {}
                }
            }
            ControlFlow::Continue(())
        }
        Clause::Call(c) => match &c.body {
            CallBody::Procedure(call) => {
                for argument in call.arguments.iter().flatten() {
                    visitor.visit_expression(argument)?;
                }
                ControlFlow::Continue(())
            }
            CallBody::Subquery(body) => visitor.visit_subquery(body),
        },
        Clause::Error(_) => ControlFlow::Continue(()),
    }
}

pub fn walk_pattern<V: Visit + ?Sized>(visitor: &mut V, pattern: &Pattern) -> VisitResult<V::Break> {
    for part in &pattern.parts {
        visitor.visit_pattern_part(part)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_projection<V: Visit + ?Sized>(
    visitor: &mut V,
    projection: &Projection,
) -> VisitResult<V::Break> {
    for item in &projection.items {
        visitor.visit_projection_item(item)?;
    }
    for sort in &projection.order_by {
        visitor.visit_expression(&sort.expression)?;
    }
    if let Some(skip) = &projection.skip {
        visitor.visit_expression(skip)?;
    }
    if let Some(limit) = &projection.limit {
        visitor.visit_expression(limit)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_pattern_part<V: Visit + ?Sized>(
    visitor: &mut V,
    part: &PatternPart,
) -> VisitResult<V::Break> {
    visitor.visit_node_pattern(&part.start)?;
    for step in &part.chain {
        visitor.visit_relationship_pattern(&step.relationship)?;
        visitor.visit_node_pattern(&step.node)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_node_pattern<V: Visit + ?Sized>(
    visitor: &mut V,
    node: &NodePattern,
) -> VisitResult<V::Break> {
    match &node.properties {
        Some(properties) => visitor.visit_expression(properties),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_relationship_pattern<V: Visit + ?Sized>(
    visitor: &mut V,
    relationship: &RelationshipPattern,
) -> VisitResult<V::Break> {
    match &relationship.properties {
        Some(properties) => visitor.visit_expression(properties),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_set_item<V: Visit + ?Sized>(visitor: &mut V, item: &SetItem) -> VisitResult<V::Break> {
    match item {
        SetItem::Property { target, value, .. } => {
            visitor.visit_expression(target)?;
            visitor.visit_expression(value)
        }
        SetItem::Replace { value, .. } | SetItem::Merge { value, .. } => {
            visitor.visit_expression(value)
        }
        SetItem::Labels { .. } => ControlFlow::Continue(()),
    }
}

pub fn walk_expression<V: Visit + ?Sized>(
    visitor: &mut V,
    expression: &Expression,
) -> VisitResult<V::Break> {
    match expression {
        Expression::Literal(..)
        | Expression::Parameter(..)
        | Expression::Variable(..)
        | Expression::CountStar(_) => ControlFlow::Continue(()),
        Expression::Property(base, _, _) | Expression::HasLabels(base, _, _) => {
            visitor.visit_expression(base)
        }
        Expression::Index(base, index, _) => {
            visitor.visit_expression(base)?;
            visitor.visit_expression(index)
        }
        Expression::Slice(base, from, to, _) => {
            visitor.visit_expression(base)?;
            for bound in [from, to].into_iter().flatten() {
                visitor.visit_expression(bound)?;
            }
            ControlFlow::Continue(())
        }
        Expression::List(items, _) => {
            for item in items {
                visitor.visit_expression(item)?;
            }
            ControlFlow::Continue(())
        }
        Expression::Map(entries, _) => {
            for entry in entries {
                visitor.visit_expression(&entry.value)?;
            }
            ControlFlow::Continue(())
        }
        Expression::FunctionCall(call) => {
            for argument in &call.arguments {
                visitor.visit_expression(argument)?;
            }
            ControlFlow::Continue(())
        }
        Expression::Unary(_, operand, _) => visitor.visit_expression(operand),
        Expression::IsNull { operand, .. } => visitor.visit_expression(operand),
        Expression::Binary(_, left, right, _) => {
            visitor.visit_expression(left)?;
            visitor.visit_expression(right)
        }
        Expression::Case(case) => {
            if let Some(operand) = &case.operand {
                visitor.visit_expression(operand)?;
            }
            for alternative in &case.alternatives {
                visitor.visit_expression(&alternative.when)?;
                visitor.visit_expression(&alternative.then)?;
            }
            match &case.default {
                Some(default) => visitor.visit_expression(default),
                None => ControlFlow::Continue(()),
            }
        }
        Expression::ListComprehension(comprehension) | Expression::Quantified(_, comprehension) => {
            visitor.visit_expression(&comprehension.list)?;
            for part in [&comprehension.predicate, &comprehension.projection]
                .into_iter()
                .flatten()
            {
                visitor.visit_expression(part)?;
            }
            ControlFlow::Continue(())
        }
        Expression::Exists(exists) => visitor.visit_subquery(&exists.body),
        Expression::PatternPredicate(part) => visitor.visit_pattern_part(part),
    }
}
