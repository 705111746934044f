//! The builder protocol: fold a filter tree into any target representation.
//!
//! A backend implements [`ExpressionBuilder`] once and receives each node of
//! the tree bottom-up. Children are always built before their parent, in
//! source order, and every node is visited exactly once. The protocol is
//! shared by raw parse trees ([`Node`], whose fields are `str` and values are
//! [`Value`]) and schema-bound [`Expression`](crate::Expression)s (whose
//! fields are the application's field type and values are
//! [`TypedValue`](crate::TypedValue)).
//!
//! ```
//! use filter_lang::{parse, ExpressionBuilder, Operator, Value};
//! use std::convert::Infallible;
//!
//! /// Counts comparisons.
//! struct Count;
//!
//! impl ExpressionBuilder for Count {
//!     type Field = str;
//!     type Value = Value;
//!     type Output = usize;
//!     type Error = Infallible;
//!
//!     fn and(&mut self, children: Vec<usize>) -> Result<usize, Infallible> {
//!         Ok(children.iter().sum())
//!     }
//!     fn or(&mut self, children: Vec<usize>) -> Result<usize, Infallible> {
//!         Ok(children.iter().sum())
//!     }
//!     fn not(&mut self, child: usize) -> Result<usize, Infallible> {
//!         Ok(child)
//!     }
//!     fn term(&mut self, _: &str, _: Operator, _: &Value) -> Result<usize, Infallible> {
//!         Ok(1)
//!     }
//! }
//!
//! let tree = parse("a = 1 AND (b = 2 OR NOT c = 3)").unwrap();
//! assert_eq!(tree.build(&mut Count), Ok(3));
//! ```

use crate::{
    ast::{Node, Operator},
    value::Value,
};

/// Target-specific construction of a filter.
///
/// Errors raised by an implementation stop the traversal and reach the
/// caller unchanged.
pub trait ExpressionBuilder {
    /// How the tree names fields.
    type Field: ?Sized;
    /// How the tree carries comparison values.
    type Value: ?Sized;
    /// What the builder produces.
    type Output;
    /// Target-specific failure.
    type Error;

    fn and(&mut self, children: Vec<Self::Output>) -> Result<Self::Output, Self::Error>;

    fn or(&mut self, children: Vec<Self::Output>) -> Result<Self::Output, Self::Error>;

    fn not(&mut self, child: Self::Output) -> Result<Self::Output, Self::Error>;

    fn term(
        &mut self,
        field: &Self::Field,
        operator: Operator,
        value: &Self::Value,
    ) -> Result<Self::Output, Self::Error>;
}

impl<B: ExpressionBuilder + ?Sized> ExpressionBuilder for &mut B {
    type Field = B::Field;
    type Value = B::Value;
    type Output = B::Output;
    type Error = B::Error;

    fn and(&mut self, children: Vec<Self::Output>) -> Result<Self::Output, Self::Error> {
        (**self).and(children)
    }

    fn or(&mut self, children: Vec<Self::Output>) -> Result<Self::Output, Self::Error> {
        (**self).or(children)
    }

    fn not(&mut self, child: Self::Output) -> Result<Self::Output, Self::Error> {
        (**self).not(child)
    }

    fn term(
        &mut self,
        field: &Self::Field,
        operator: Operator,
        value: &Self::Value,
    ) -> Result<Self::Output, Self::Error> {
        (**self).term(field, operator, value)
    }
}

impl Node {
    /// Post-order fold of the tree through `builder`.
    ///
    /// [`Node::Root`] yields its child's result unchanged.
    pub fn build<B>(&self, builder: &mut B) -> Result<B::Output, B::Error>
    where
        B: ExpressionBuilder<Field = str, Value = Value> + ?Sized,
    {
        match self {
            Node::Root(inner) => inner.build(builder),
            Node::And(children) => {
                let built = build_all(children, builder)?;
                builder.and(built)
            }
            Node::Or(children) => {
                let built = build_all(children, builder)?;
                builder.or(built)
            }
            Node::Not(inner) => {
                let built = inner.build(builder)?;
                builder.not(built)
            }
            Node::Comparison {
                field,
                operator,
                value,
            } => builder.term(field, *operator, value),
        }
    }
}

fn build_all<B>(children: &[Node], builder: &mut B) -> Result<Vec<B::Output>, B::Error>
where
    B: ExpressionBuilder<Field = str, Value = Value> + ?Sized,
{
    children.iter().map(|child| child.build(builder)).collect()
}
