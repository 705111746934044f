//! In-memory evaluation of filters against JSON records.
//!
//! [`PredicateBuilder`] is an [`ExpressionBuilder`] whose output is a
//! [`Predicate`]: a closure testing one `serde_json::Value` record. Fields are
//! the record's top-level keys and a missing key reads as `null`.
//!
//! # Comparison rules
//!
//! - numbers compare numerically, whatever mix of integer and decimal
//! - strings order lexicographically, which also orders ISO dates
//! - ordering between other kinds (or against `null`) is false
//! - `CONTAINS` tests substrings of a string, or membership of an array
//! - `STARTS WITH` / `ENDS WITH` only match strings
//! - string operators are case-sensitive unless
//!   [`EvaluatorOptions::case_insensitive`] is set
//!
//! # Examples
//!
//! ```
//! use filter_lang::{evaluator::compile, parse, EvaluatorOptions};
//! use serde_json::json;
//!
//! let tree = parse(r#"status = "active" AND score >= 75"#).unwrap();
//! let matches = compile(&tree, EvaluatorOptions::default());
//!
//! assert!(matches(&json!({"status": "active", "score": 80.5})));
//! assert!(!matches(&json!({"status": "active", "score": 10})));
//! assert!(!matches(&json!({"score": 99})));
//! ```

use std::{cmp::Ordering, convert::Infallible, marker::PhantomData};

use serde_json::{Number, Value as JsonValue};

use crate::{
    ast::{Node, Operator},
    builder::ExpressionBuilder,
    schema::TypedValue,
    value::Value,
};

/// A compiled filter.
pub type Predicate = Box<dyn Fn(&JsonValue) -> bool + Send + Sync>;

/// Evaluation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Fold case in `CONTAINS`, `STARTS WITH` and `ENDS WITH`.
    pub case_insensitive: bool,
}

impl EvaluatorOptions {
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }
}

/// Comparison values the evaluator can match against JSON.
pub trait JsonOperand {
    fn to_json(&self) -> JsonValue;
}

fn json_number(n: f64) -> JsonValue {
    Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

impl JsonOperand for Value {
    fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::String(s) | Value::Literal(s) => JsonValue::String(s.clone()),
            Value::Integer(n) => JsonValue::from(*n),
            Value::Decimal(n) => json_number(*n),
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::List(items) => JsonValue::Array(items.iter().map(JsonOperand::to_json).collect()),
        }
    }
}

impl JsonOperand for TypedValue {
    fn to_json(&self) -> JsonValue {
        match self {
            TypedValue::Integer(n) => JsonValue::from(*n),
            TypedValue::Decimal(n) => json_number(*n),
            TypedValue::Boolean(b) => JsonValue::Bool(*b),
            TypedValue::List(items) => {
                JsonValue::Array(items.iter().map(JsonOperand::to_json).collect())
            }
            // Strings, symbols and dates all compare as their text.
            other => other.to_raw().as_text().map_or(JsonValue::Null, |s| {
                JsonValue::String(s.to_string())
            }),
        }
    }
}

/// Builds [`Predicate`]s.
pub struct PredicateBuilder<'a, F: ?Sized, V: ?Sized> {
    field_name: Box<dyn Fn(&F) -> String + 'a>,
    options: EvaluatorOptions,
    _value: PhantomData<fn(&V)>,
}

impl<'a, V: ?Sized> PredicateBuilder<'a, str, V> {
    pub fn new(options: EvaluatorOptions) -> Self {
        Self::with_field_names(str::to_string, options)
    }
}

impl<'a, F: ?Sized, V: ?Sized> PredicateBuilder<'a, F, V> {
    /// Predicates over records keyed by `field_name(field)`.
    pub fn with_field_names(field_name: impl Fn(&F) -> String + 'a, options: EvaluatorOptions) -> Self {
        PredicateBuilder {
            field_name: Box::new(field_name),
            options,
            _value: PhantomData,
        }
    }
}

impl<'a, F: ?Sized, V: JsonOperand + ?Sized> ExpressionBuilder for PredicateBuilder<'a, F, V> {
    type Field = F;
    type Value = V;
    type Output = Predicate;
    type Error = Infallible;

    fn and(&mut self, children: Vec<Predicate>) -> Result<Predicate, Infallible> {
        Ok(Box::new(move |record: &JsonValue| children.iter().all(|p| p(record))))
    }

    fn or(&mut self, children: Vec<Predicate>) -> Result<Predicate, Infallible> {
        Ok(Box::new(move |record: &JsonValue| children.iter().any(|p| p(record))))
    }

    fn not(&mut self, child: Predicate) -> Result<Predicate, Infallible> {
        Ok(Box::new(move |record: &JsonValue| !child(record)))
    }

    fn term(&mut self, field: &F, operator: Operator, value: &V) -> Result<Predicate, Infallible> {
        let name = (self.field_name)(field);
        let expected = value.to_json();
        let options = self.options;
        Ok(Box::new(move |record: &JsonValue| {
            let actual = record.get(&name).unwrap_or(&JsonValue::Null);
            compare(actual, operator, &expected, options)
        }))
    }
}

/// Compiles a raw tree into a predicate.
pub fn compile(node: &Node, options: EvaluatorOptions) -> Predicate {
    let mut builder = PredicateBuilder::<str, Value>::new(options);
    match node.build(&mut builder) {
        Ok(predicate) => predicate,
        Err(never) => match never {},
    }
}

fn compare(actual: &JsonValue, operator: Operator, expected: &JsonValue, options: EvaluatorOptions) -> bool {
    match operator {
        Operator::Eq => json_eq(actual, expected),
        Operator::Neq => !json_eq(actual, expected),
        Operator::Gt => ordering(actual, expected) == Some(Ordering::Greater),
        Operator::Gte => matches!(ordering(actual, expected), Some(Ordering::Greater | Ordering::Equal)),
        Operator::Lt => ordering(actual, expected) == Some(Ordering::Less),
        Operator::Lte => matches!(ordering(actual, expected), Some(Ordering::Less | Ordering::Equal)),
        Operator::In => member(actual, expected),
        Operator::NotIn => !member(actual, expected),
        Operator::Contains => match (actual, expected) {
            (JsonValue::Array(items), _) => items.iter().any(|item| json_eq(item, expected)),
            (JsonValue::String(s), JsonValue::String(needle)) => {
                text_match(s, needle, options, |s, n| s.contains(n))
            }
            _ => false,
        },
        Operator::StartsWith => match (actual, expected) {
            (JsonValue::String(s), JsonValue::String(prefix)) => {
                text_match(s, prefix, options, |s, p| s.starts_with(p))
            }
            _ => false,
        },
        Operator::EndsWith => match (actual, expected) {
            (JsonValue::String(s), JsonValue::String(suffix)) => {
                text_match(s, suffix, options, |s, p| s.ends_with(p))
            }
            _ => false,
        },
    }
}

fn text_match(
    haystack: &str,
    needle: &str,
    options: EvaluatorOptions,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    if options.case_insensitive {
        test(&haystack.to_lowercase(), &needle.to_lowercase())
    } else {
        test(haystack, needle)
    }
}

fn json_eq(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

fn ordering(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn member(actual: &JsonValue, list: &JsonValue) -> bool {
    match list {
        JsonValue::Array(items) => items.iter().any(|item| json_eq(actual, item)),
        _ => false,
    }
}
