//! # Filter Query Language - Abstract Syntax Tree
//!
//! This module defines the tokens and tree that the lexer and parser produce
//! for filter text such as:
//!
//! ```text
//! status = "active" AND score >= 75
//! ```
//!
//! ## Organisation
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison operators and operator sets
//! - **[nodes]** - The closed set of tree nodes
//!
//! ## Precedence
//!
//! `NOT` binds tighter than `AND`, which binds tighter than `OR`. Chains of
//! the same connective at one level are flattened into a single node, and
//! parentheses yield exactly the subtree they enclose:
//!
//! ```text
//! a = 1 OR b = 2 AND c = 3      Or[a = 1, And[b = 2, c = 3]]
//! (a = 1 OR b = 2) AND c = 3    And[Or[a = 1, b = 2], c = 3]
//! ```
//!
//! ## Values
//!
//! Comparisons carry a [`Value`](crate::Value): a quoted string, a bare
//! literal, an integer, a decimal, a boolean, `null`, or a bracketed list.
//! `IN` and `NOT IN` take a list; every other operator takes a scalar.
pub mod nodes;
pub mod operators;
pub mod tokens;

pub use nodes::Node;
pub use operators::{Operator, OperatorSet};
pub use tokens::{Spanned, Token, TokenKind};
