//! Rewrites that shrink an [`Expression`] without changing which records it
//! matches.
//!
//! Each rewrite is an [`Optimizer`]; [`CompositeOptimizer`] runs a pipeline
//! of them until nothing changes. [`Expression::simplify`] applies the
//! standard pipeline:
//!
//! ```text
//! NOT NOT a = 1                       a = 1
//! NOT a > 5                           a <= 5
//! (a = 1 AND (b = 2 AND c = 3))       (a = 1 AND b = 2 AND c = 3)
//! (a = 1 OR a = 1 OR b = 2)           (a = 1 OR b = 2)
//! (a > 5 AND a > 3)                   a > 5
//! (a IN [1,2,3] AND a IN [1,2])       a IN [1,2]
//! (a = 1 AND (a = 1 OR b = 2))        a = 1
//! ```
//!
//! Negation pushing assumes every compared field has a value. A missing field
//! fails both `a > 5` and `a <= 5` under the in-memory evaluator, so
//! `NOT a > 5` matches such a record and its rewrite does not.

use crate::{
    ast::Operator,
    expression::{Comparison, Expression},
    schema::TypedValue,
};

/// A single tree rewrite.
pub trait Optimizer<F> {
    fn name(&self) -> &'static str;

    fn optimize(&self, expr: Expression<F>) -> Expression<F>;
}

/// Flattens nested `AND`/`OR` of the same kind, unwraps single-operand
/// combinators and removes double negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralOptimizer;

impl<F> Optimizer<F> for StructuralOptimizer {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn optimize(&self, expr: Expression<F>) -> Expression<F> {
        match expr {
            Expression::And(operands) => {
                let mut flat = Vec::with_capacity(operands.len());
                for operand in operands {
                    match self.optimize(operand) {
                        Expression::And(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Expression::all(flat)
            }
            Expression::Or(operands) => {
                let mut flat = Vec::with_capacity(operands.len());
                for operand in operands {
                    match self.optimize(operand) {
                        Expression::Or(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Expression::any(flat)
            }
            Expression::Not(inner) => match self.optimize(*inner) {
                Expression::Not(twice) => *twice,
                other => other.not(),
            },
            term @ Expression::Term(_) => term,
        }
    }
}

/// Replaces `NOT term` by the term with the complementary operator where one
/// exists (`=`/`!=`, `>`/`<=`, `>=`/`<`, `IN`/`NOT IN`).
///
/// Only exact when the compared field is always present. Against a record
/// missing `a`, `NOT a > 5` matches but `a <= 5` does not, so drop this step
/// from the pipeline when fields are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotPushingOptimizer;

impl<F> Optimizer<F> for NotPushingOptimizer {
    fn name(&self) -> &'static str {
        "not-pushing"
    }

    fn optimize(&self, expr: Expression<F>) -> Expression<F> {
        match expr {
            Expression::And(operands) => {
                Expression::And(operands.into_iter().map(|e| self.optimize(e)).collect())
            }
            Expression::Or(operands) => {
                Expression::Or(operands.into_iter().map(|e| self.optimize(e)).collect())
            }
            Expression::Not(inner) => match self.optimize(*inner) {
                Expression::Term(c) => match c.operator.negated() {
                    Some(operator) => Expression::Term(Comparison { operator, ..c }),
                    None => Expression::Term(c).not(),
                },
                other => other.not(),
            },
            term @ Expression::Term(_) => term,
        }
    }
}

/// Drops repeated operands (`A OR A`) and absorbed ones
/// (`A AND (A OR B)` is `A`, `A OR (A AND B)` is `A`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DeduplicateOptimizer;

impl DeduplicateOptimizer {
    fn reduce<F: PartialEq>(
        &self,
        operands: Vec<Expression<F>>,
        absorbed_by: fn(&Expression<F>) -> Option<&[Expression<F>]>,
    ) -> Vec<Expression<F>> {
        let mut unique: Vec<Expression<F>> = Vec::with_capacity(operands.len());
        for operand in operands {
            let operand = self.optimize(operand);
            if !unique.contains(&operand) {
                unique.push(operand);
            }
        }

        let keep: Vec<bool> = unique
            .iter()
            .enumerate()
            .map(|(i, operand)| match absorbed_by(operand) {
                Some(inner) => !unique
                    .iter()
                    .enumerate()
                    .any(|(j, other)| i != j && inner.contains(other)),
                None => true,
            })
            .collect();

        unique
            .into_iter()
            .zip(keep)
            .filter_map(|(operand, keep)| keep.then_some(operand))
            .collect()
    }
}

fn or_operands<F>(expr: &Expression<F>) -> Option<&[Expression<F>]> {
    match expr {
        Expression::Or(operands) => Some(operands),
        _ => None,
    }
}

fn and_operands<F>(expr: &Expression<F>) -> Option<&[Expression<F>]> {
    match expr {
        Expression::And(operands) => Some(operands),
        _ => None,
    }
}

impl<F: PartialEq> Optimizer<F> for DeduplicateOptimizer {
    fn name(&self) -> &'static str {
        "deduplicate"
    }

    fn optimize(&self, expr: Expression<F>) -> Expression<F> {
        match expr {
            Expression::And(operands) => Expression::all(self.reduce(operands, or_operands)),
            Expression::Or(operands) => Expression::any(self.reduce(operands, and_operands)),
            Expression::Not(inner) => self.optimize(*inner).not(),
            term @ Expression::Term(_) => term,
        }
    }
}

/// Drops a comparison from an `AND` when a sibling comparison on the same
/// field already implies it:
///
/// - numeric bounds in one direction keep the tightest (`a > 10 AND a >= 10`
///   is `a > 10`, `a <= 10 AND a <= 5` is `a <= 5`)
/// - `IN` keeps the smallest list, `NOT IN` the largest, when one list
///   contains the other
///
/// Contradictions like `a > 10 AND a < 5` are kept as written since the
/// grammar has no `false` to replace them with.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonOptimizer;

impl ComparisonOptimizer {
    fn prune<F: PartialEq>(&self, operands: Vec<Expression<F>>) -> Vec<Expression<F>> {
        let operands: Vec<Expression<F>> = operands.into_iter().map(|e| self.optimize(e)).collect();

        // Of two equivalent comparisons the first one stays.
        let keep: Vec<bool> = operands
            .iter()
            .enumerate()
            .map(|(i, operand)| {
                let Some(weak) = operand.as_term() else {
                    return true;
                };
                !operands.iter().enumerate().any(|(j, other)| {
                    i != j
                        && other.as_term().is_some_and(|strong| {
                            strong.field == weak.field
                                && implies(strong, weak)
                                && (j < i || !implies(weak, strong))
                        })
                })
            })
            .collect();

        operands
            .into_iter()
            .zip(keep)
            .filter_map(|(operand, keep)| keep.then_some(operand))
            .collect()
    }
}

/// True when every value satisfying `strong` also satisfies `weak`.
fn implies<F>(strong: &Comparison<F>, weak: &Comparison<F>) -> bool {
    match (strong.operator, weak.operator) {
        (Operator::In, Operator::In) => contained(&strong.value, &weak.value),
        (Operator::NotIn, Operator::NotIn) => contained(&weak.value, &strong.value),
        (s, w) => {
            let (Some(x), Some(y)) = (strong.value.as_float(), weak.value.as_float()) else {
                return false;
            };
            match (s, w) {
                (Operator::Gt, Operator::Gt | Operator::Gte) | (Operator::Gte, Operator::Gte) => x >= y,
                (Operator::Gte, Operator::Gt) => x > y,
                (Operator::Lt, Operator::Lt | Operator::Lte) | (Operator::Lte, Operator::Lte) => x <= y,
                (Operator::Lte, Operator::Lt) => x < y,
                _ => false,
            }
        }
    }
}

fn contained(inner: &TypedValue, outer: &TypedValue) -> bool {
    match (inner.as_list(), outer.as_list()) {
        (Some(inner), Some(outer)) => inner.iter().all(|v| outer.contains(v)),
        _ => false,
    }
}

impl<F: PartialEq> Optimizer<F> for ComparisonOptimizer {
    fn name(&self) -> &'static str {
        "comparison"
    }

    fn optimize(&self, expr: Expression<F>) -> Expression<F> {
        match expr {
            Expression::And(operands) => Expression::all(self.prune(operands)),
            Expression::Or(operands) => {
                Expression::Or(operands.into_iter().map(|e| self.optimize(e)).collect())
            }
            Expression::Not(inner) => self.optimize(*inner).not(),
            term @ Expression::Term(_) => term,
        }
    }
}

/// Runs optimizers in order, repeating the pipeline until the expression
/// stops changing or the iteration cap is hit.
pub struct CompositeOptimizer<'a, F> {
    steps: Vec<Box<dyn Optimizer<F> + 'a>>,
    max_iterations: usize,
}

impl<'a, F: Clone + PartialEq + 'a> CompositeOptimizer<'a, F> {
    pub fn new() -> Self {
        CompositeOptimizer {
            steps: Vec::new(),
            max_iterations: 10,
        }
    }

    /// Structural cleanup, negation pushing, redundant comparisons, then
    /// deduplication.
    pub fn standard() -> Self {
        Self::new()
            .with(StructuralOptimizer)
            .with(NotPushingOptimizer)
            .with(ComparisonOptimizer)
            .with(DeduplicateOptimizer)
    }

    pub fn with(mut self, step: impl Optimizer<F> + 'a) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl<'a, F: Clone + PartialEq + 'a> Default for CompositeOptimizer<'a, F> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a, F: Clone + PartialEq> Optimizer<F> for CompositeOptimizer<'a, F> {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn optimize(&self, mut expr: Expression<F>) -> Expression<F> {
        for iteration in 0..self.max_iterations {
            let before = expr.clone();
            for step in &self.steps {
                expr = step.optimize(expr);
                tracing::trace!(step = step.name(), iteration, "optimizer step");
            }
            if expr == before {
                tracing::debug!(iterations = iteration + 1, "expression simplified");
                return expr;
            }
        }
        tracing::debug!(
            iterations = self.max_iterations,
            "simplification stopped at the iteration cap"
        );
        expr
    }
}

impl<F: Clone + PartialEq> Expression<F> {
    /// Applies [`CompositeOptimizer::standard`].
    pub fn simplify(self) -> Self {
        CompositeOptimizer::standard().optimize(self)
    }
}
