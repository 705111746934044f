//! # Field schema and type system
//!
//! A [`Schema`] is the closed set of fields an application lets users filter
//! on. Each field has an application-side identifier `F` (typically a small
//! enum), the name used in filter text, and a [`FieldType`] policy deciding
//! which operators are legal and how raw values coerce.
//!
//! ```
//! use filter_lang::schema::{DecimalType, Schema, StringType};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Field {
//!     Title,
//!     Score,
//! }
//!
//! let schema = Schema::builder()
//!     .field(Field::Title, "title", StringType::new())
//!     .field(Field::Score, "score", DecimalType::new())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.field("score").map(|f| f.id), Some(Field::Score));
//! assert_eq!(schema.name_of(&Field::Title), Some("title"));
//! assert!(schema.field("Score").is_none());
//! ```
//!
//! The schema is immutable once built and may be shared between threads.
pub mod typed_value;
pub mod types;

use std::{collections::HashMap, fmt};

pub use typed_value::{Symbolic, TypedValue};
pub use types::{
    BooleanType, DateTimeType, DateType, DecimalType, DynamicEnumType, EnumType, IntegerType,
    StringType,
};

use crate::{
    ast::{Operator, OperatorSet},
    error::{FilterError, FilterResult, TypeError},
    value::Value,
};

/// A type policy for one field.
pub trait FieldType: Send + Sync {
    /// Short name shown in diagnostics (`string`, `enum`, ...).
    fn type_name(&self) -> &'static str;

    /// Operators permitted on fields of this type.
    fn allowed_operators(&self) -> OperatorSet;

    /// Checks `raw` against the type and the operator's shape, producing the
    /// domain value.
    fn coerce(&self, raw: &Value, operator: Operator) -> Result<TypedValue, TypeError>;
}

/// One field of a schema.
pub struct FieldDef<F> {
    pub id: F,
    pub name: String,
    pub field_type: Box<dyn FieldType>,
}

impl<F: fmt::Debug> fmt::Debug for FieldDef<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type", &self.field_type.type_name())
            .field("operators", &self.field_type.allowed_operators())
            .finish()
    }
}

/// Fixed mapping between field identifiers, names and types.
pub struct Schema<F> {
    fields: Vec<FieldDef<F>>,
    by_name: HashMap<String, usize>,
}

impl<F: fmt::Debug> fmt::Debug for Schema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

impl<F: Clone + PartialEq> Schema<F> {
    pub fn builder() -> SchemaBuilder<F> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Looks a field up by its name in filter text. Names are case-sensitive.
    pub fn field(&self, name: &str) -> Option<&FieldDef<F>> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn field_by_id(&self, id: &F) -> Option<&FieldDef<F>> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn name_of(&self, id: &F) -> Option<&str> {
        self.field_by_id(id).map(|f| f.name.as_str())
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef<F>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct SchemaBuilder<F> {
    fields: Vec<FieldDef<F>>,
}

impl<F: Clone + PartialEq> SchemaBuilder<F> {
    pub fn field(
        mut self,
        id: F,
        name: impl Into<String>,
        field_type: impl FieldType + 'static,
    ) -> Self {
        self.fields.push(FieldDef {
            id,
            name: name.into(),
            field_type: Box::new(field_type),
        });
        self
    }

    /// Finishes the schema.
    ///
    /// Fails if a name or identifier is used twice, or a name could not be
    /// written in filter text (it must be a bare word other than `AND`, `OR`
    /// or `NOT`).
    pub fn build(self) -> FilterResult<Schema<F>> {
        let mut by_name = HashMap::with_capacity(self.fields.len());
        for (i, def) in self.fields.iter().enumerate() {
            if !is_field_name(&def.name) {
                return Err(FilterError::InvalidSchema {
                    reason: format!("`{}` cannot be used as a field name", def.name),
                });
            }
            if by_name.insert(def.name.clone(), i).is_some() {
                return Err(FilterError::InvalidSchema {
                    reason: format!("field `{}` is declared twice", def.name),
                });
            }
            if self.fields[..i].iter().any(|other| other.id == def.id) {
                return Err(FilterError::InvalidSchema {
                    reason: format!("field `{}` reuses another field's identifier", def.name),
                });
            }
        }
        tracing::debug!(fields = self.fields.len(), "schema built");
        Ok(Schema {
            fields: self.fields,
            by_name,
        })
    }
}

fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !["AND", "OR", "NOT"]
            .iter()
            .any(|k| name.eq_ignore_ascii_case(k))
}
