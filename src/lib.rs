//! # filter-lang
//!
//! A small filter query language:
//!
//! ```text
//! status = "active" AND (score >= 75 OR tag IN [urgent, vip])
//! ```
//!
//! Text goes through the [`lexer`] and [`parser`] into a [`Node`] tree. Any
//! [`ExpressionBuilder`] folds that tree into a target representation:
//! canonical text ([`output::QueryPrinter`]), an in-memory predicate over
//! JSON ([`evaluator::PredicateBuilder`]), or whatever a backend needs.
//!
//! [`TypedExpressionBuilder`] binds the language to an application
//! [`Schema`](schema::Schema), checking fields, operators and values, and
//! turns text into typed [`Expression`]s and back.
pub mod ast;
pub mod builder;
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod schema;
pub mod simplify;
pub mod typed;
pub mod value;

pub use ast::{Node, Operator, OperatorSet, Spanned, Token, TokenKind};
pub use builder::ExpressionBuilder;
pub use error::{FilterError, FilterResult, LexError, LexErrorKind, ParseError, TypeError};
pub use evaluator::{EvaluatorOptions, Predicate, PredicateBuilder};
pub use expression::{Comparison, Expression};
pub use lexer::{Lexer, Position, tokenize};
pub use output::{QueryPrinter, to_query_string};
pub use parser::{Parser, ParserOptions, parse, parse_with};
pub use schema::{FieldType, Schema, TypedValue};
pub use simplify::{CompositeOptimizer, Optimizer};
pub use typed::{Binder, TypedExpressionBuilder};
pub use value::Value;
