use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::value::{Value, write_decimal};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A comparison value after schema coercion.
///
/// Unlike a raw [`Value`], a typed value carries its domain meaning: an enum
/// constant is a [`TypedValue::Symbol`] in its canonical spelling, dates are
/// real calendar dates, and integers given to a decimal field have been
/// widened.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    String(String),
    /// Canonical symbol of an enum constant
    Symbol(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<TypedValue>),
}

/// A Rust enum usable with [`EnumType`](crate::schema::EnumType).
///
/// ```
/// use filter_lang::schema::Symbolic;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum ReviewStatus {
///     Draft,
///     Published,
/// }
///
/// impl Symbolic for ReviewStatus {
///     fn symbols() -> &'static [Self] {
///         &[ReviewStatus::Draft, ReviewStatus::Published]
///     }
///
///     fn symbol(&self) -> &'static str {
///         match self {
///             ReviewStatus::Draft => "DRAFT",
///             ReviewStatus::Published => "PUBLISHED",
///         }
///     }
/// }
///
/// assert_eq!(ReviewStatus::from_symbol("DRAFT"), Some(ReviewStatus::Draft));
/// assert_eq!(ReviewStatus::from_symbol("draft"), None);
/// ```
pub trait Symbolic: Sized + Clone + 'static {
    /// Every constant, in declaration order.
    fn symbols() -> &'static [Self];

    /// The constant's spelling in filter text.
    fn symbol(&self) -> &'static str;

    /// Case-sensitive lookup by spelling.
    fn from_symbol(symbol: &str) -> Option<Self> {
        Self::symbols().iter().find(|s| s.symbol() == symbol).cloned()
    }
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) | TypedValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Integer(n) => Some(*n as f64),
            TypedValue::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            TypedValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            TypedValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Recovers the enum constant of a symbol value.
    pub fn as_enum<E: Symbolic>(&self) -> Option<E> {
        match self {
            TypedValue::Symbol(s) => E::from_symbol(s),
            _ => None,
        }
    }

    /// The raw value whose canonical text this value prints as.
    ///
    /// Coercing the result with the field's type yields this value again.
    pub fn to_raw(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Symbol(s) if is_bare_word(s) => Value::Literal(s.clone()),
            TypedValue::Symbol(s) => Value::String(s.clone()),
            TypedValue::Integer(n) => Value::Integer(*n),
            TypedValue::Decimal(n) => Value::Decimal(*n),
            TypedValue::Boolean(b) => Value::Boolean(*b),
            TypedValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            TypedValue::DateTime(dt) => Value::String(dt.format(DATE_TIME_FORMAT).to_string()),
            TypedValue::List(items) => Value::List(items.iter().map(TypedValue::to_raw).collect()),
        }
    }

    pub(crate) fn contains_quote(&self) -> bool {
        match self {
            TypedValue::String(s) | TypedValue::Symbol(s) => s.contains('"'),
            TypedValue::List(items) => items.iter().any(TypedValue::contains_quote),
            _ => false,
        }
    }
}

/// True if `s` lexes as a single word that the parser reads back as a literal.
pub(crate) fn is_bare_word(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_well = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !["true", "false", "null"]
            .iter()
            .any(|k| s.eq_ignore_ascii_case(k))
}

/// Canonical grammar form. Symbols print bare when they can, dates print as
/// quoted ISO strings.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Decimal(n) => write_decimal(f, *n),
            TypedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            other => write!(f, "{}", other.to_raw()),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<i64> for TypedValue {
    fn from(n: i64) -> Self {
        TypedValue::Integer(n)
    }
}

impl From<f64> for TypedValue {
    fn from(n: f64) -> Self {
        TypedValue::Decimal(n)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Boolean(b)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(d: NaiveDate) -> Self {
        TypedValue::Date(d)
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(dt: NaiveDateTime) -> Self {
        TypedValue::DateTime(dt)
    }
}

impl<T: Into<TypedValue>> From<Vec<T>> for TypedValue {
    fn from(items: Vec<T>) -> Self {
        TypedValue::List(items.into_iter().map(Into::into).collect())
    }
}
