//! Canonical text output for filter trees.
//!
//! [`QueryPrinter`] is an [`ExpressionBuilder`] that renders a tree back
//! into the filter grammar. The output is deterministic and parses back to a
//! structurally equal tree:
//!
//! - every `AND` / `OR` with two or more operands is parenthesised,
//!   operands joined by ` AND ` / ` OR `
//! - a connective with a single operand renders as that operand
//! - negation renders as `NOT x`; its operand is a comparison or an
//!   already parenthesised connective, so no extra group is needed
//! - operators use their canonical symbol (`=`, `!=`, `NOT IN`, ...)
//! - strings are double-quoted, literals bare, lists as `[a,b,c]`
//!
//! # Examples
//!
//! ```
//! use filter_lang::{parse, output::to_query_string};
//!
//! let tree = parse(r#"status = "active" AND score >= 75"#).unwrap();
//! assert_eq!(to_query_string(&tree), r#"(status = "active" AND score >= 75)"#);
//! ```

use std::{convert::Infallible, fmt, marker::PhantomData};

use crate::{
    ast::{Node, Operator},
    builder::ExpressionBuilder,
    value::Value,
};

type FieldNamer<'a, F> = Box<dyn Fn(&F) -> String + 'a>;

/// Builds the canonical text of a tree.
///
/// Field names are produced by a caller-supplied function so the same printer
/// serves raw trees (`F = str`) and schema-bound expressions, where the name
/// comes from the schema.
pub struct QueryPrinter<'a, F: ?Sized, V: ?Sized> {
    field_name: FieldNamer<'a, F>,
    operator_names: bool,
    _value: PhantomData<fn(&V)>,
}

impl<'a, V: ?Sized> QueryPrinter<'a, str, V> {
    /// Printer for trees whose fields are already names.
    pub fn new() -> Self {
        Self::with_field_names(str::to_string)
    }
}

impl<'a, V: ?Sized> Default for QueryPrinter<'a, str, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, F: ?Sized, V: ?Sized> QueryPrinter<'a, F, V> {
    pub fn with_field_names(field_name: impl Fn(&F) -> String + 'a) -> Self {
        QueryPrinter {
            field_name: Box::new(field_name),
            operator_names: false,
            _value: PhantomData,
        }
    }

    /// Print operators by name (`GTE`, `NOT_IN`) instead of by symbol.
    ///
    /// Useful for logs; the result is not valid filter text.
    pub fn operator_names(mut self, enabled: bool) -> Self {
        self.operator_names = enabled;
        self
    }

    fn join(&self, children: Vec<String>, connective: &str) -> String {
        if children.len() == 1 {
            return children.into_iter().next().unwrap_or_default();
        }
        format!("({})", children.join(connective))
    }
}

impl<'a, F: ?Sized, V: fmt::Display + ?Sized> ExpressionBuilder for QueryPrinter<'a, F, V> {
    type Field = F;
    type Value = V;
    type Output = String;
    type Error = Infallible;

    fn and(&mut self, children: Vec<String>) -> Result<String, Infallible> {
        Ok(self.join(children, " AND "))
    }

    fn or(&mut self, children: Vec<String>) -> Result<String, Infallible> {
        Ok(self.join(children, " OR "))
    }

    fn not(&mut self, child: String) -> Result<String, Infallible> {
        Ok(format!("NOT {}", child))
    }

    fn term(&mut self, field: &F, operator: Operator, value: &V) -> Result<String, Infallible> {
        let operator = if self.operator_names {
            operator.name()
        } else {
            operator.symbol()
        };
        Ok(format!("{} {} {}", (self.field_name)(field), operator, value))
    }
}

/// Canonical text of a raw tree.
pub fn to_query_string(node: &Node) -> String {
    let mut printer = QueryPrinter::<str, Value>::new();
    match node.build(&mut printer) {
        Ok(text) => text,
        Err(never) => match never {},
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_query_string(self))
    }
}
