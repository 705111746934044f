//! Documentation content for the fql CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Values,
    Schema,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "values" | "value" | "literals" => Some(Self::Values),
            "schema" | "types" | "type" => Some(Self::Schema),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"FQL DOCUMENTATION

FQL is a filter query language: boolean predicates over named fields, such as

  status = "active" AND score >= 75

DOCUMENTATION CATEGORIES

  syntax            Comparisons, AND / OR / NOT, parentheses and precedence
  operators         Comparison operators and their synonyms
  values            Strings, literals, numbers, booleans, null and lists
  schema            Field types and the operators each one allows

QUICK REFERENCE

  field = value             Comparison
  a AND b, a OR b           Connectives (AND binds tighter)
  NOT a, !a, ~a             Negation
  ( ... )                   Grouping
  field IN [v1, v2]         Membership

Run 'fql doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Values) => Ok(VALUES_DOC),
        Some(DocCategory::Schema) => Ok(SCHEMA_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

GRAMMAR

  Expr        ::= OrExpr
  OrExpr      ::= AndExpr ( "OR" AndExpr )*
  AndExpr     ::= UnaryExpr ( "AND" UnaryExpr )*
  UnaryExpr   ::= ( "NOT" | "!" | "~" ) UnaryExpr | Primary
  Primary     ::= "(" Expr ")" | FieldName Operator Value

PRECEDENCE

  NOT binds tightest, then AND, then OR. Parentheses override:

    a = 1 OR b = 2 AND c = 3        a = 1 OR (b = 2 AND c = 3)
    (a = 1 OR b = 2) AND c = 3      as written

KEYWORDS

  AND, OR, NOT, IN, IS, CONTAINS, STARTS WITH, ENDS WITH, true, false and
  null match in any case. Field names and literals are case-sensitive.

CANONICAL FORM

  'fql parse' prints the canonical form: every AND / OR is parenthesised,
  NOT is written NOT x and operators use their canonical symbol.

    fql parse 'status is "active" and not score < 75'
    (status = "active" AND NOT score < 75)
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

  =             equal              also ==, IS
  !=            not equal          also <>, ~=
  >  >=  <  <=  ordering           numbers numerically, strings by text
  IN            member of list     field IN [a, b, c]
  NOT IN        not member         field NOT IN [a, b]
  CONTAINS      substring          also array membership in 'fql check'
  STARTS WITH   prefix
  ENDS WITH     suffix

  IN and NOT IN need a list; every other operator needs a single value.

  String operators are case-sensitive. Pass --ignore-case to 'fql check'
  to fold case.
"#;

const VALUES_DOC: &str = r#"VALUES

  "text"        String. No escapes: the string ends at the next double quote,
                so a string cannot contain one.
  ACTIVE        Literal (bare word), usually an enum constant
  42  -7        Integer
  3.5  -0.25    Decimal (written with a point)
  true  false   Boolean (any case)
  null          Null; a missing field equals null
  [1, 2, 3]     List, only after IN / NOT IN. May be empty. No nesting.
"#;

const SCHEMA_DOC: &str = r#"SCHEMA

Applications bind filters to a schema: a fixed set of named fields, each with
a type deciding which operators are allowed and which values are accepted.

  TYPE        DEFAULT OPERATORS                 ACCEPTS
  string      = != CONTAINS STARTS/ENDS WITH    strings and literals
  enum        = != IN NOT IN                    declared symbols only
  integer     = != > >= < <= IN NOT IN          integers, "42"
  decimal     = != > >= < <= IN NOT IN          numbers, "4.2"
  boolean     = !=                              true, false, "true"
  date        = != > >= < <= IN NOT IN          "2024-01-31"
  datetime    = != > >= < <= IN NOT IN          "2024-01-31T09:30:00"

  Every type accepts null.

ERRORS

  unknown field               the name is not in the schema
  operator is not allowed     the field's type does not permit the operator
  invalid value               the value does not coerce to the field's type
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!(DocCategory::from_name("OPS"), Some(DocCategory::Operators));
        assert_eq!(DocCategory::from_name("types"), Some(DocCategory::Schema));
        assert!(get_doc_category("methods").is_err());
    }
}
