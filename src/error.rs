//! Error types for lexing, parsing and schema binding.

use thiserror::Error;

use crate::{ast::Operator, lexer::Position};

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Why the lexer stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedCharacter(char),
    UnterminatedString,
    MalformedNumber(String),
}

/// Error encountered during lexical analysis.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} at {position}", describe_lex(.reason))]
pub struct LexError {
    pub position: Position,
    pub reason: LexErrorKind,
}

fn describe_lex(reason: &LexErrorKind) -> String {
    match reason {
        LexErrorKind::UnexpectedCharacter(c) => format!("unexpected character '{}'", c),
        LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
        LexErrorKind::MalformedNumber(n) => format!("malformed number '{}'", n),
    }
}

/// A grammar violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("expected {expected}, found {found} at {position}")]
pub struct ParseError {
    pub position: Position,
    pub expected: String,
    pub found: String,
}

impl ParseError {
    pub fn new(position: Position, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ParseError {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A value that does not fit a field's declared type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct TypeError {
    pub reason: String,
}

impl TypeError {
    pub fn new(reason: impl Into<String>) -> Self {
        TypeError {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur turning text into an expression or back.
///
/// Errors are reported in pipeline order: a lexing problem hides any parse
/// problem, and schema errors are only possible on a well-formed tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The text could not be tokenized.
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// The tokens do not form a filter.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The text is longer than the configured limit.
    #[error("filter is {length} bytes long, the limit is {limit}")]
    InputTooLong {
        /// Length of the rejected input in bytes.
        length: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// The field is not part of the schema.
    #[error("unknown field: {field}")]
    UnknownField {
        /// The unrecognised field name.
        field: String,
    },

    /// The field's type does not permit the operator.
    #[error("operator {operator} is not allowed for field {field}")]
    OperatorNotAllowed {
        /// Name of the field.
        field: String,
        /// The rejected operator.
        operator: Operator,
    },

    /// The value does not coerce to the field's type.
    #[error("invalid value for {field} {operator}: {reason}")]
    ValueType {
        /// Name of the field.
        field: String,
        /// Operator of the offending comparison.
        operator: Operator,
        /// What was wrong with the value.
        reason: String,
    },

    /// The schema definition itself is unusable.
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// What was wrong.
        reason: String,
    },

    /// A typed expression is structurally unusable (for example an empty `AND`).
    #[error("invalid expression: {reason}")]
    InvalidExpression {
        /// What was wrong.
        reason: String,
    },
}

impl FilterError {
    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        FilterError::UnknownField {
            field: field.into(),
        }
    }

    /// Creates an operator-not-allowed error.
    pub fn operator_not_allowed(field: impl Into<String>, operator: Operator) -> Self {
        FilterError::OperatorNotAllowed {
            field: field.into(),
            operator,
        }
    }

    /// Lifts a type error raised by a field type.
    pub fn value_type(field: impl Into<String>, operator: Operator, error: TypeError) -> Self {
        FilterError::ValueType {
            field: field.into(),
            operator,
            reason: error.reason,
        }
    }

    /// Creates an invalid expression error.
    pub fn invalid_expression(reason: impl Into<String>) -> Self {
        FilterError::InvalidExpression {
            reason: reason.into(),
        }
    }

    /// True for errors raised before schema binding (lexing, parsing, limits).
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            FilterError::Lex(_) | FilterError::Parse(_) | FilterError::InputTooLong { .. }
        )
    }
}
