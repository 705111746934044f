//! Filter text to canonical text or a JSON tree

use std::convert::Infallible;

use serde_json::{Value as JsonValue, json};

use super::CliError;
use crate::{
    ExpressionBuilder, Node, Operator, ParserOptions, Value,
    evaluator::JsonOperand,
    output::QueryPrinter,
    parse_with,
};

/// Folds a parse tree into JSON, one object per node.
///
/// ```text
/// a = 1 AND NOT b IN [x]
/// {"and": [{"field": "a", "operator": "EQ", "kind": "integer", "value": 1},
///          {"not": {"field": "b", "operator": "IN", "kind": "list", "value": ["x"]}}]}
/// ```
#[derive(Debug, Default)]
pub struct JsonTreeBuilder;

impl ExpressionBuilder for JsonTreeBuilder {
    type Field = str;
    type Value = Value;
    type Output = JsonValue;
    type Error = Infallible;

    fn and(&mut self, children: Vec<JsonValue>) -> Result<JsonValue, Infallible> {
        Ok(json!({ "and": children }))
    }

    fn or(&mut self, children: Vec<JsonValue>) -> Result<JsonValue, Infallible> {
        Ok(json!({ "or": children }))
    }

    fn not(&mut self, child: JsonValue) -> Result<JsonValue, Infallible> {
        Ok(json!({ "not": child }))
    }

    fn term(&mut self, field: &str, operator: Operator, value: &Value) -> Result<JsonValue, Infallible> {
        Ok(json!({
            "field": field,
            "operator": operator.name(),
            "kind": value.kind_name(),
            "value": value.to_json(),
        }))
    }
}

/// JSON form of a parse tree.
pub fn tree_to_json(node: &Node) -> JsonValue {
    match node.build(&mut JsonTreeBuilder) {
        Ok(tree) => tree,
        Err(never) => match never {},
    }
}

/// Options for the parse command
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// The filter to parse
    pub filter: String,
    /// Print the tree as JSON instead of filter text
    pub json: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Print operator names instead of symbols
    pub names: bool,
    /// Parser limits
    pub parser: ParserOptions,
}

/// Parses a filter and renders it as requested.
pub fn execute_parse(options: &ParseOptions) -> Result<String, CliError> {
    let tree = parse_with(&options.filter, &options.parser)?;

    if options.json {
        let json = tree_to_json(&tree);
        let text = if options.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        return Ok(text);
    }

    let mut printer = QueryPrinter::<str, Value>::new().operator_names(options.names);
    match tree.build(&mut printer) {
        Ok(text) => Ok(text),
        Err(never) => match never {},
    }
}
