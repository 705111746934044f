//! Schema-bound filter expressions.
//!
//! An [`Expression<F>`] has the same shape as a parse tree but names fields
//! by the application's identifier type `F` and carries values already
//! coerced by the field's type. Expressions are plain values: build them by
//! hand, get them from
//! [`TypedExpressionBuilder::deserialise`](crate::TypedExpressionBuilder::deserialise),
//! and hand them to any [`ExpressionBuilder`].

use crate::{
    ast::Operator,
    builder::ExpressionBuilder,
    schema::TypedValue,
};

/// A single typed predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<F> {
    pub field: F,
    pub operator: Operator,
    pub value: TypedValue,
}

/// A typed filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<F> {
    And(Vec<Expression<F>>),
    Or(Vec<Expression<F>>),
    Not(Box<Expression<F>>),
    Term(Comparison<F>),
}

impl<F> Expression<F> {
    pub fn term(field: F, operator: Operator, value: impl Into<TypedValue>) -> Self {
        Expression::Term(Comparison {
            field,
            operator,
            value: value.into(),
        })
    }

    /// Conjunction of `operands`; a single operand is returned as is.
    ///
    /// No operands give an empty `And`, which matches everything under the
    /// evaluator but cannot be serialised.
    pub fn all(operands: impl IntoIterator<Item = Expression<F>>) -> Self {
        let mut operands: Vec<_> = operands.into_iter().collect();
        if operands.len() == 1
            && let Some(only) = operands.pop()
        {
            return only;
        }
        Expression::And(operands)
    }

    /// Disjunction of `operands`; a single operand is returned as is.
    ///
    /// No operands give an empty `Or`, which matches nothing under the
    /// evaluator but cannot be serialised.
    pub fn any(operands: impl IntoIterator<Item = Expression<F>>) -> Self {
        let mut operands: Vec<_> = operands.into_iter().collect();
        if operands.len() == 1
            && let Some(only) = operands.pop()
        {
            return only;
        }
        Expression::Or(operands)
    }

    /// `self AND other`. Chained calls extend one conjunction.
    pub fn and(self, other: Expression<F>) -> Self {
        match self {
            Expression::And(mut operands) => {
                operands.push(other);
                Expression::And(operands)
            }
            first => Expression::And(vec![first, other]),
        }
    }

    /// `self OR other`. Chained calls extend one disjunction.
    pub fn or(self, other: Expression<F>) -> Self {
        match self {
            Expression::Or(mut operands) => {
                operands.push(other);
                Expression::Or(operands)
            }
            first => Expression::Or(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expression::Not(Box::new(self))
    }

    pub fn as_term(&self) -> Option<&Comparison<F>> {
        match self {
            Expression::Term(c) => Some(c),
            _ => None,
        }
    }

    /// Post-order fold through `builder`, children before parents.
    pub fn build<B>(&self, builder: &mut B) -> Result<B::Output, B::Error>
    where
        B: ExpressionBuilder<Field = F, Value = TypedValue> + ?Sized,
    {
        match self {
            Expression::And(operands) => {
                let built = operands
                    .iter()
                    .map(|e| e.build(builder))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.and(built)
            }
            Expression::Or(operands) => {
                let built = operands
                    .iter()
                    .map(|e| e.build(builder))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.or(built)
            }
            Expression::Not(inner) => {
                let built = inner.build(builder)?;
                builder.not(built)
            }
            Expression::Term(c) => builder.term(&c.field, c.operator, &c.value),
        }
    }

    /// Pre-order walk. The visitor gets each node with its depth, the root
    /// being at depth 1.
    pub fn traverse(&self, mut visitor: impl FnMut(usize, &Expression<F>)) {
        self.walk(1, &mut visitor);
    }

    fn walk(&self, depth: usize, visitor: &mut impl FnMut(usize, &Expression<F>)) {
        visitor(depth, self);
        match self {
            Expression::And(operands) | Expression::Or(operands) => {
                for operand in operands {
                    operand.walk(depth + 1, visitor);
                }
            }
            Expression::Not(inner) => inner.walk(depth + 1, visitor),
            Expression::Term(_) => {}
        }
    }

    /// Nesting depth; a lone term has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        self.traverse(|depth, _| deepest = deepest.max(depth));
        deepest
    }

    /// Weighted size used to cap how expensive a user filter may be.
    ///
    /// Terms count 1, `NOT` 2, `AND` 2 and `OR` 3, and every node nested
    /// deeper than three levels costs one more per extra level.
    pub fn complexity(&self) -> usize {
        let mut total = 0;
        self.traverse(|depth, node| {
            let weight = match node {
                Expression::Term(_) => 1,
                Expression::Not(_) | Expression::And(_) => 2,
                Expression::Or(_) => 3,
            };
            total += weight + depth.saturating_sub(3);
        });
        total
    }

    /// Number of terms.
    pub fn term_count(&self) -> usize {
        let mut count = 0;
        self.traverse(|_, node| {
            if node.as_term().is_some() {
                count += 1;
            }
        });
        count
    }
}

impl<F: PartialEq> Expression<F> {
    /// Fields referenced, in order of first appearance.
    pub fn fields(&self) -> Vec<&F> {
        let mut fields: Vec<&F> = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a F>) {
        match self {
            Expression::And(operands) | Expression::Or(operands) => {
                for operand in operands {
                    operand.collect_fields(out);
                }
            }
            Expression::Not(inner) => inner.collect_fields(out),
            Expression::Term(c) => {
                if !out.contains(&&c.field) {
                    out.push(&c.field);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_operand_combinators_collapse() {
        let t = Expression::term("a", Operator::Eq, 1i64);
        assert_eq!(Expression::all(vec![t.clone()]), t);
        assert_eq!(Expression::any(vec![t.clone()]), t);
    }

    #[test]
    fn test_no_operands_give_empty_combinators() {
        assert_eq!(Expression::<&str>::all(vec![]), Expression::And(vec![]));
        assert_eq!(Expression::<&str>::any(vec![]), Expression::Or(vec![]));
    }

    #[test]
    fn test_chained_and_extends() {
        let e = Expression::term("a", Operator::Eq, 1i64)
            .and(Expression::term("b", Operator::Eq, 2i64))
            .and(Expression::term("c", Operator::Eq, 3i64));
        assert!(matches!(&e, Expression::And(ops) if ops.len() == 3));
    }

    #[test]
    fn test_complexity_weights() {
        let a = || Expression::term("a", Operator::Eq, 1i64);
        assert_eq!(a().complexity(), 1);
        // OR(3) + 2 terms at depth 2
        assert_eq!(a().or(a()).complexity(), 5);
        // AND(2) + NOT(2) + OR(3) at depth 3 + 2 terms at depth 4 costing 2 each
        let nested = a().and(a().or(a()).not());
        assert_eq!(nested.complexity(), 2 + 1 + 2 + 3 + 2 + 2);
        assert_eq!(nested.depth(), 4);
    }
}
