//! Concrete field type policies.
//!
//! Every policy accepts `null`, in scalar position and inside lists, and
//! enforces the operator's shape: `IN` / `NOT IN` take a list, everything
//! else a scalar.

use std::marker::PhantomData;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use super::{
    FieldType,
    typed_value::{DATE_FORMAT, DATE_TIME_FORMAT, Symbolic, TypedValue},
};
use crate::{
    ast::{Operator, OperatorSet},
    error::TypeError,
    value::Value,
};

/// `=`, `!=`, `CONTAINS`, `STARTS WITH`, `ENDS WITH`
pub fn string_operators() -> OperatorSet {
    OperatorSet::of(&[
        Operator::Eq,
        Operator::Neq,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ])
}

/// `=`, `!=`, `IN`, `NOT IN`
pub fn enum_operators() -> OperatorSet {
    OperatorSet::of(&[Operator::Eq, Operator::Neq, Operator::In, Operator::NotIn])
}

/// Equality, ordering and membership.
pub fn ordered_operators() -> OperatorSet {
    OperatorSet::of(&[
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
    ])
}

/// `=`, `!=`
pub fn boolean_operators() -> OperatorSet {
    OperatorSet::of(&[Operator::Eq, Operator::Neq])
}

/// Applies the operator's shape rule, then `scalar` to every non-null scalar.
fn coerce_shaped(
    raw: &Value,
    operator: Operator,
    scalar: impl Fn(&Value) -> Result<TypedValue, TypeError>,
) -> Result<TypedValue, TypeError> {
    let one = |value: &Value| match value {
        Value::Null => Ok(TypedValue::Null),
        Value::List(_) => Err(TypeError::new("lists cannot be nested")),
        other => scalar(other),
    };

    match raw {
        Value::List(items) if operator.takes_list() => {
            let items = items.iter().map(&one).collect::<Result<Vec<_>, _>>()?;
            Ok(TypedValue::List(items))
        }
        Value::List(_) => Err(TypeError::new(format!(
            "`{}` takes a single value, not a list",
            operator
        ))),
        _ if operator.takes_list() => Err(TypeError::new(format!("`{}` takes a list", operator))),
        other => one(other),
    }
}

fn mismatch(expected: &str, found: &Value) -> TypeError {
    TypeError::new(format!("expected {}, found {} {}", expected, found.kind_name(), found))
}

/// Free text.
#[derive(Debug, Clone)]
pub struct StringType {
    operators: OperatorSet,
    pattern: Option<Regex>,
}

impl StringType {
    pub fn new() -> Self {
        StringType {
            operators: string_operators(),
            pattern: None,
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }

    /// Only accept strings matching `pattern`.
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

impl Default for StringType {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for StringType {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| {
            let text = value.as_text().ok_or_else(|| mismatch("a string", value))?;
            if let Some(pattern) = &self.pattern
                && !pattern.is_match(text)
            {
                return Err(TypeError::new(format!(
                    "\"{}\" does not match /{}/",
                    text,
                    pattern.as_str()
                )));
            }
            Ok(TypedValue::String(text.to_string()))
        })
    }
}

/// A fixed set of symbols taken from a Rust enum. Matching is case-sensitive.
pub struct EnumType<E> {
    operators: OperatorSet,
    _symbols: PhantomData<fn() -> E>,
}

impl<E: Symbolic> EnumType<E> {
    pub fn new() -> Self {
        EnumType {
            operators: enum_operators(),
            _symbols: PhantomData,
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }
}

impl<E: Symbolic> Default for EnumType<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Symbolic> FieldType for EnumType<E> {
    fn type_name(&self) -> &'static str {
        "enum"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| {
            let text = value.as_text().ok_or_else(|| mismatch("a symbol", value))?;
            match E::from_symbol(text) {
                Some(symbol) => Ok(TypedValue::Symbol(symbol.symbol().to_string())),
                None => Err(unknown_symbol(
                    text,
                    E::symbols().iter().map(Symbolic::symbol),
                )),
            }
        })
    }
}

fn unknown_symbol<'a>(text: &str, symbols: impl Iterator<Item = &'a str>) -> TypeError {
    let known: Vec<&str> = symbols.collect();
    TypeError::new(format!("`{}` is not one of {}", text, known.join(", ")))
}

/// A symbol set known only at runtime. Matching ignores case and yields the
/// declared spelling.
#[derive(Debug, Clone)]
pub struct DynamicEnumType {
    symbols: Vec<String>,
    operators: OperatorSet,
}

impl DynamicEnumType {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DynamicEnumType {
            symbols: symbols.into_iter().map(Into::into).collect(),
            operators: enum_operators(),
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl FieldType for DynamicEnumType {
    fn type_name(&self) -> &'static str {
        "enum"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| {
            let text = value.as_text().ok_or_else(|| mismatch("a symbol", value))?;
            self.symbols
                .iter()
                .find(|s| s.to_lowercase() == text.to_lowercase())
                .map(|s| TypedValue::Symbol(s.clone()))
                .ok_or_else(|| unknown_symbol(text, self.symbols.iter().map(String::as_str)))
        })
    }
}

/// Whole numbers. Quoted strings holding an integer are accepted.
#[derive(Debug, Clone)]
pub struct IntegerType {
    operators: OperatorSet,
}

impl IntegerType {
    pub fn new() -> Self {
        IntegerType {
            operators: ordered_operators(),
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }
}

impl Default for IntegerType {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for IntegerType {
    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| match value {
            Value::Integer(n) => Ok(TypedValue::Integer(*n)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|_| mismatch("an integer", value)),
            other => Err(mismatch("an integer", other)),
        })
    }
}

/// Decimal numbers. Integers are widened.
#[derive(Debug, Clone)]
pub struct DecimalType {
    operators: OperatorSet,
}

impl DecimalType {
    pub fn new() -> Self {
        DecimalType {
            operators: ordered_operators(),
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }
}

impl Default for DecimalType {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for DecimalType {
    fn type_name(&self) -> &'static str {
        "decimal"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| {
            let number = match value {
                Value::Integer(n) => Some(*n as f64),
                Value::Decimal(n) => Some(*n),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            number
                .filter(|n| n.is_finite())
                .map(TypedValue::Decimal)
                .ok_or_else(|| mismatch("a decimal", value))
        })
    }
}

/// `true` / `false`.
#[derive(Debug, Clone)]
pub struct BooleanType {
    operators: OperatorSet,
}

impl BooleanType {
    pub fn new() -> Self {
        BooleanType {
            operators: boolean_operators(),
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }
}

impl Default for BooleanType {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for BooleanType {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| match value {
            Value::Boolean(b) => Ok(TypedValue::Boolean(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(TypedValue::Boolean(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(TypedValue::Boolean(false)),
            other => Err(mismatch("a boolean", other)),
        })
    }
}

/// Calendar dates written `"yyyy-mm-dd"`.
#[derive(Debug, Clone)]
pub struct DateType {
    operators: OperatorSet,
}

impl DateType {
    pub fn new() -> Self {
        DateType {
            operators: ordered_operators(),
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }
}

impl Default for DateType {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldType for DateType {
    fn type_name(&self) -> &'static str {
        "date"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| {
            value
                .as_text()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .map(TypedValue::Date)
                .ok_or_else(|| mismatch("a date (yyyy-mm-dd)", value))
        })
    }
}

/// Timestamps without zone, written `"yyyy-mm-ddThh:mm:ss"`. A bare date
/// means midnight.
#[derive(Debug, Clone)]
pub struct DateTimeType {
    operators: OperatorSet,
}

impl DateTimeType {
    pub fn new() -> Self {
        DateTimeType {
            operators: ordered_operators(),
        }
    }

    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }
}

impl Default for DateTimeType {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl FieldType for DateTimeType {
    fn type_name(&self) -> &'static str {
        "datetime"
    }

    fn allowed_operators(&self) -> OperatorSet {
        self.operators
    }

    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError> {
        coerce_shaped(raw, operator, |value| {
            value
                .as_text()
                .and_then(parse_datetime)
                .map(TypedValue::DateTime)
                .ok_or_else(|| mismatch("a timestamp (yyyy-mm-ddThh:mm:ss)", value))
        })
    }
}
