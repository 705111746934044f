//! Run a filter over JSON input

use serde_json::Value as JsonValue;

use super::CliError;
use crate::{EvaluatorOptions, ParserOptions, evaluator::compile, output::to_query_string, parse_with};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter to apply
    pub filter: String,
    /// JSON input string: an array of records or a single record
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Case-insensitive string operators
    pub ignore_case: bool,
    /// Parser limits
    pub parser: ParserOptions,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed; carries the canonical form of the filter
    SyntaxValid(String),
    /// The records that matched, as a JSON array
    Success(JsonValue),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let tree = parse_with(&options.filter, &options.parser)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(to_query_string(&tree)));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let input: JsonValue = serde_json::from_str(json_str)?;

    let matches = compile(
        &tree,
        EvaluatorOptions::default().case_insensitive(options.ignore_case),
    );

    let records = match input {
        JsonValue::Array(records) => records,
        record => vec![record],
    };
    let total = records.len();
    let selected: Vec<JsonValue> = records.into_iter().filter(|r| matches(r)).collect();
    tracing::debug!(total, matched = selected.len(), "filter applied");

    Ok(CheckResult::Success(JsonValue::Array(selected)))
}
