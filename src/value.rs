use std::fmt;

/// A value as written in filter text, before any schema coercion.
///
/// The parser keeps quoted strings and bare words apart: a bare word such as
/// `ACTIVE` is a [`Value::Literal`] and is usually an enum constant, while
/// `"ACTIVE"` is a [`Value::String`].
///
/// # Examples
///
/// ```
/// use filter_lang::Value;
///
/// let scalar = Value::Integer(42);
/// let list = Value::List(vec![Value::Literal("DRAFT".into()), Value::Null]);
///
/// assert_eq!(scalar.to_string(), "42");
/// assert_eq!(list.to_string(), "[DRAFT,null]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null` / `NULL`
    Null,

    /// Double-quoted string
    String(String),

    /// Unquoted bare word
    Literal(String),

    /// Integer number
    Integer(i64),

    /// Number written with a decimal point
    Decimal(f64),

    /// `true` / `false` (any case)
    Boolean(bool),

    /// `[v1, v2, ...]`
    List(Vec<Value>),
}

impl Value {
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Text of a string or bare word
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Literal(_) => "literal",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Boolean(_) => "boolean",
            Value::List(_) => "list",
        }
    }

    /// True if any string (at any depth) contains a double quote, which the
    /// grammar has no way to express.
    pub fn contains_quote(&self) -> bool {
        match self {
            Value::String(s) => s.contains('"'),
            Value::List(items) => items.iter().any(Value::contains_quote),
            _ => false,
        }
    }
}

/// Writes a decimal so that it lexes back as a decimal (`22` becomes `22.0`).
pub(crate) fn write_decimal(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 {
        write!(f, "{:.1}", n)
    } else {
        write!(f, "{}", n)
    }
}

/// Canonical grammar form of the value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Literal(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(n) => write_decimal(f, *n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Decimal(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
