//! The schema-validated round trip between filter text and [`Expression`]s.
//!
//! ```
//! use filter_lang::schema::{EnumType, IntegerType, Schema, Symbolic};
//! use filter_lang::{Expression, Operator, TypedExpressionBuilder};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Status {
//!     Draft,
//!     Live,
//! }
//!
//! impl Symbolic for Status {
//!     fn symbols() -> &'static [Self] {
//!         &[Status::Draft, Status::Live]
//!     }
//!     fn symbol(&self) -> &'static str {
//!         match self {
//!             Status::Draft => "DRAFT",
//!             Status::Live => "LIVE",
//!         }
//!     }
//! }
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Field {
//!     Status,
//!     Score,
//! }
//!
//! let schema = Schema::builder()
//!     .field(Field::Status, "status", EnumType::<Status>::new())
//!     .field(Field::Score, "score", IntegerType::new())
//!     .build()
//!     .unwrap();
//! let filters = TypedExpressionBuilder::new(schema);
//!
//! let expr = filters.deserialise("status IS LIVE and score >= 75").unwrap();
//! assert_eq!(
//!     expr,
//!     Expression::term(Field::Status, Operator::Eq, filters.symbol(Status::Live))
//!         .and(Expression::term(Field::Score, Operator::Gte, 75i64))
//! );
//! assert_eq!(filters.serialise(&expr).unwrap(), "(status = LIVE AND score >= 75)");
//! ```

use std::fmt;

use crate::{
    ast::Operator,
    builder::ExpressionBuilder,
    error::{FilterError, FilterResult, TypeError},
    evaluator::{EvaluatorOptions, Predicate, PredicateBuilder},
    expression::Expression,
    output::QueryPrinter,
    parser::{ParserOptions, parse_with},
    schema::{Schema, Symbolic, TypedValue},
    value::Value,
};

/// Binds a raw parse tree to a schema.
///
/// Each comparison is checked in order: the field must exist, its type must
/// allow the operator, and the value must coerce.
pub struct Binder<'s, F> {
    schema: &'s Schema<F>,
}

impl<'s, F: Clone + PartialEq> Binder<'s, F> {
    pub fn new(schema: &'s Schema<F>) -> Self {
        Binder { schema }
    }
}

impl<'s, F: Clone + PartialEq> ExpressionBuilder for Binder<'s, F> {
    type Field = str;
    type Value = Value;
    type Output = Expression<F>;
    type Error = FilterError;

    fn and(&mut self, children: Vec<Expression<F>>) -> FilterResult<Expression<F>> {
        Ok(Expression::And(children))
    }

    fn or(&mut self, children: Vec<Expression<F>>) -> FilterResult<Expression<F>> {
        Ok(Expression::Or(children))
    }

    fn not(&mut self, child: Expression<F>) -> FilterResult<Expression<F>> {
        Ok(Expression::Not(Box::new(child)))
    }

    fn term(
        &mut self,
        field: &str,
        operator: Operator,
        value: &Value,
    ) -> FilterResult<Expression<F>> {
        let def = self
            .schema
            .field(field)
            .ok_or_else(|| FilterError::unknown_field(field))?;

        if !def.field_type.allowed_operators().contains(operator) {
            return Err(FilterError::operator_not_allowed(field, operator));
        }

        let value = def
            .field_type
            .coerce(value, operator)
            .map_err(|e| FilterError::value_type(field, operator, e))?;

        Ok(Expression::term(def.id.clone(), operator, value))
    }
}

/// Schema-checked `deserialise` / `serialise` for one application schema.
pub struct TypedExpressionBuilder<F> {
    schema: Schema<F>,
    options: ParserOptions,
}

impl<F: fmt::Debug> fmt::Debug for TypedExpressionBuilder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedExpressionBuilder")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish()
    }
}

impl<F: Clone + PartialEq + fmt::Debug> TypedExpressionBuilder<F> {
    pub fn new(schema: Schema<F>) -> Self {
        TypedExpressionBuilder {
            schema,
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Schema<F> {
        &self.schema
    }

    /// The typed value of an enum constant.
    pub fn symbol<E: Symbolic>(&self, constant: E) -> TypedValue {
        TypedValue::Symbol(constant.symbol().to_string())
    }

    /// Parses `text` and binds it to the schema.
    ///
    /// Errors come back in pipeline order: lexing, then parsing, then the
    /// first comparison (left to right) the schema rejects.
    pub fn deserialise(&self, text: &str) -> FilterResult<Expression<F>> {
        let tree = parse_with(text, &self.options)?;
        let expr = tree.build(&mut Binder::new(&self.schema))?;
        tracing::debug!(terms = expr.term_count(), "filter deserialised");
        Ok(expr)
    }

    /// Canonical text of `expr`, after checking it with [`validate`](Self::validate).
    ///
    /// Deserialising the result gives back an expression equal to `expr`.
    pub fn serialise(&self, expr: &Expression<F>) -> FilterResult<String> {
        self.validate(expr)?;
        let schema = &self.schema;
        let mut printer = QueryPrinter::<F, TypedValue>::with_field_names(|id: &F| {
            schema.name_of(id).unwrap_or_default().to_string()
        });
        let text = match expr.build(&mut printer) {
            Ok(text) => text,
            Err(never) => match never {},
        };
        tracing::debug!(length = text.len(), "filter serialised");
        Ok(text)
    }

    /// Compiles `expr` into a predicate over JSON records keyed by field name.
    pub fn predicate(&self, expr: &Expression<F>, options: EvaluatorOptions) -> Predicate {
        let schema = &self.schema;
        let mut builder = PredicateBuilder::<F, TypedValue>::with_field_names(
            |id: &F| schema.name_of(id).unwrap_or_default().to_string(),
            options,
        );
        match expr.build(&mut builder) {
            Ok(predicate) => predicate,
            Err(never) => match never {},
        }
    }

    /// Checks an expression built by application code against the schema.
    ///
    /// Rejects unknown fields, operators the field does not allow, values
    /// that are not what the field's type would produce, strings containing
    /// `"` (the grammar cannot write them), `AND` / `OR` with fewer than
    /// two operands, and trees nested deeper than the parser options allow.
    pub fn validate(&self, expr: &Expression<F>) -> FilterResult<()> {
        let levels = expr.depth().saturating_sub(1);
        if levels > self.options.max_depth {
            return Err(FilterError::invalid_expression(format!(
                "expression is nested {} levels deep, the limit is {}",
                levels, self.options.max_depth
            )));
        }
        self.check(expr)
    }

    fn check(&self, expr: &Expression<F>) -> FilterResult<()> {
        match expr {
            Expression::And(operands) | Expression::Or(operands) => {
                if operands.len() < 2 {
                    return Err(FilterError::invalid_expression(format!(
                        "`{}` needs at least two operands, found {}",
                        if matches!(expr, Expression::And(_)) { "AND" } else { "OR" },
                        operands.len()
                    )));
                }
                operands.iter().try_for_each(|e| self.check(e))
            }
            Expression::Not(inner) => self.check(inner),
            Expression::Term(c) => {
                let def = self
                    .schema
                    .field_by_id(&c.field)
                    .ok_or_else(|| FilterError::unknown_field(format!("{:?}", c.field)))?;

                if !def.field_type.allowed_operators().contains(c.operator) {
                    return Err(FilterError::operator_not_allowed(&def.name, c.operator));
                }
                if c.value.contains_quote() {
                    return Err(FilterError::invalid_expression(format!(
                        "value of `{}` contains a double quote",
                        def.name
                    )));
                }

                let recoerced = def
                    .field_type
                    .coerce(&c.value.to_raw(), c.operator)
                    .map_err(|e| FilterError::value_type(&def.name, c.operator, e))?;
                if recoerced != c.value {
                    return Err(FilterError::value_type(
                        &def.name,
                        c.operator,
                        TypeError::new(format!(
                            "{} is not a {} value",
                            c.value,
                            def.field_type.type_name()
                        )),
                    ));
                }
                Ok(())
            }
        }
    }
}
