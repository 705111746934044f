// tests/schema_tests.rs

use chrono::NaiveDate;
use filter_lang::schema::{
    BooleanType, DateTimeType, DateType, DecimalType, DynamicEnumType, EnumType, FieldType,
    IntegerType, Schema, StringType, Symbolic, TypedValue,
};
use filter_lang::{Expression, FilterError, Operator, OperatorSet, TypedExpressionBuilder, Value};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ReviewStatus {
    Draft,
    InReview,
    Published,
}

impl Symbolic for ReviewStatus {
    fn symbols() -> &'static [Self] {
        &[ReviewStatus::Draft, ReviewStatus::InReview, ReviewStatus::Published]
    }

    fn symbol(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "DRAFT",
            ReviewStatus::InReview => "IN_REVIEW",
            ReviewStatus::Published => "PUBLISHED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Title,
    Status,
    Score,
    Price,
    Archived,
    Created,
    Updated,
    Tag,
    Sku,
}

fn filters() -> TypedExpressionBuilder<Field> {
    let schema = Schema::builder()
        .field(Field::Title, "title", StringType::new())
        .field(Field::Status, "status", EnumType::<ReviewStatus>::new())
        .field(Field::Score, "score", IntegerType::new())
        .field(Field::Price, "price", DecimalType::new())
        .field(Field::Archived, "archived", BooleanType::new())
        .field(Field::Created, "created", DateType::new())
        .field(Field::Updated, "updated", DateTimeType::new())
        .field(Field::Tag, "tag", DynamicEnumType::new(["urgent", "Low"]))
        .field(
            Field::Sku,
            "sku",
            StringType::new()
                .with_operators(OperatorSet::of(&[Operator::Eq]))
                .with_pattern(Regex::new(r"^[A-Z]{3}-\d+$").unwrap()),
        )
        .build()
        .unwrap();
    TypedExpressionBuilder::new(schema)
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_literal_coerces_to_enum() {
    let expr = filters().deserialise("status = DRAFT").unwrap();
    let term = expr.as_term().unwrap();

    assert_eq!(term.field, Field::Status);
    assert_eq!(term.value, TypedValue::Symbol("DRAFT".to_string()));
    assert_eq!(term.value.as_enum::<ReviewStatus>(), Some(ReviewStatus::Draft));
}

#[test]
fn test_unknown_enum_symbol() {
    let err = filters().deserialise("status = MADEUP").unwrap_err();
    assert!(matches!(
        &err,
        FilterError::ValueType { field, operator: Operator::Eq, .. } if field == "status"
    ));
    assert_eq!(
        err.to_string(),
        "invalid value for status =: `MADEUP` is not one of DRAFT, IN_REVIEW, PUBLISHED"
    );
}

#[test]
fn test_enum_matching_is_case_sensitive() {
    assert!(matches!(
        filters().deserialise("status = draft"),
        Err(FilterError::ValueType { .. })
    ));
}

#[test]
fn test_operator_not_allowed() {
    let err = filters().deserialise(r#"status CONTAINS "x""#).unwrap_err();
    assert_eq!(
        err,
        FilterError::OperatorNotAllowed {
            field: "status".to_string(),
            operator: Operator::Contains,
        }
    );
    assert_eq!(err.to_string(), "operator CONTAINS is not allowed for field status");
}

#[test]
fn test_unknown_field() {
    assert_eq!(
        filters().deserialise("ghost = 1").unwrap_err(),
        FilterError::UnknownField {
            field: "ghost".to_string()
        }
    );
    // Field names are case-sensitive.
    assert!(matches!(
        filters().deserialise("Title = \"x\""),
        Err(FilterError::UnknownField { .. })
    ));
}

#[test]
fn test_first_error_left_to_right() {
    let err = filters()
        .deserialise("score = 1 AND ghost = 2 AND status CONTAINS \"x\"")
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownField { field } if field == "ghost"));
}

#[test]
fn test_syntax_errors_before_schema_errors() {
    let err = filters().deserialise("ghost = 1 AND (").unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(err, FilterError::Parse(_)));
}

#[test]
fn test_unknown_field_checked_before_operator() {
    assert!(matches!(
        filters().deserialise("ghost CONTAINS \"x\""),
        Err(FilterError::UnknownField { .. })
    ));
}

#[test]
fn test_operator_checked_before_value() {
    assert!(matches!(
        filters().deserialise("archived > MADEUP"),
        Err(FilterError::OperatorNotAllowed { .. })
    ));
}

// ============================================================================
// Type policies
// ============================================================================

#[test]
fn test_string_type() {
    let f = filters();
    let expr = f.deserialise("title STARTS WITH Intro").unwrap();
    assert_eq!(
        expr,
        Expression::term(Field::Title, Operator::StartsWith, "Intro")
    );
    assert!(matches!(
        f.deserialise("title = 5"),
        Err(FilterError::ValueType { .. })
    ));
    assert!(matches!(
        f.deserialise("title > \"a\""),
        Err(FilterError::OperatorNotAllowed { .. })
    ));
}

#[test]
fn test_string_pattern_and_custom_operators() {
    let f = filters();
    assert!(f.deserialise(r#"sku = "ABC-12""#).is_ok());
    let err = f.deserialise(r#"sku = "abc""#).unwrap_err();
    assert!(err.to_string().contains("does not match"));
    assert!(matches!(
        f.deserialise(r#"sku CONTAINS "ABC""#),
        Err(FilterError::OperatorNotAllowed { .. })
    ));
}

#[test]
fn test_enum_lists() {
    let expr = filters()
        .deserialise("status NOT IN [DRAFT, \"PUBLISHED\"]")
        .unwrap();
    assert_eq!(
        expr,
        Expression::term(
            Field::Status,
            Operator::NotIn,
            TypedValue::List(vec![
                TypedValue::Symbol("DRAFT".to_string()),
                TypedValue::Symbol("PUBLISHED".to_string()),
            ])
        )
    );
}

#[test]
fn test_integer_type() {
    let f = filters();
    assert_eq!(
        f.deserialise("score IN [1, \"2\", null]").unwrap(),
        Expression::term(
            Field::Score,
            Operator::In,
            TypedValue::List(vec![
                TypedValue::Integer(1),
                TypedValue::Integer(2),
                TypedValue::Null
            ])
        )
    );
    assert!(matches!(
        f.deserialise("score = 1.5"),
        Err(FilterError::ValueType { .. })
    ));
    assert!(matches!(
        f.deserialise("score STARTS WITH 1"),
        Err(FilterError::OperatorNotAllowed { .. })
    ));
}

#[test]
fn test_decimal_type_widens_integers() {
    let expr = filters().deserialise("price < 10").unwrap();
    assert_eq!(expr, Expression::term(Field::Price, Operator::Lt, 10.0));
}

#[test]
fn test_boolean_type() {
    let f = filters();
    assert_eq!(
        f.deserialise("archived = TRUE").unwrap(),
        Expression::term(Field::Archived, Operator::Eq, true)
    );
    assert_eq!(
        f.deserialise("archived != \"false\"").unwrap(),
        Expression::term(Field::Archived, Operator::Neq, false)
    );
    assert!(f.deserialise("archived = yes").is_err());
}

#[test]
fn test_date_types() {
    let f = filters();
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(
        f.deserialise("created >= \"2024-02-29\"").unwrap(),
        Expression::term(Field::Created, Operator::Gte, day)
    );
    assert!(matches!(
        f.deserialise("created = \"2023-02-29\""),
        Err(FilterError::ValueType { .. })
    ));
    assert_eq!(
        f.deserialise("updated < \"2024-02-29T12:00:00\"").unwrap(),
        Expression::term(
            Field::Updated,
            Operator::Lt,
            day.and_hms_opt(12, 0, 0).unwrap()
        )
    );
}

#[test]
fn test_dynamic_enum_canonicalises() {
    let f = filters();
    assert_eq!(
        f.deserialise("tag = URGENT").unwrap(),
        Expression::term(Field::Tag, Operator::Eq, TypedValue::Symbol("urgent".to_string()))
    );
    assert_eq!(
        f.deserialise("tag IN [low]").unwrap(),
        Expression::term(
            Field::Tag,
            Operator::In,
            TypedValue::List(vec![TypedValue::Symbol("Low".to_string())])
        )
    );
    assert!(f.deserialise("tag = high").is_err());
}

#[test]
fn test_null_accepted_everywhere() {
    let f = filters();
    for field in ["title", "status", "score", "price", "archived", "created", "updated", "tag"] {
        let expr = f.deserialise(&format!("{} != null", field)).unwrap();
        assert_eq!(expr.as_term().unwrap().value, TypedValue::Null, "field {}", field);
    }
}

#[test]
fn test_type_shape_rules() {
    let t = StringType::new();
    assert!(t.coerce(&Value::List(vec![]), Operator::Eq).is_err());
    let e = EnumType::<ReviewStatus>::new();
    assert!(e.coerce(&Value::Literal("DRAFT".to_string()), Operator::In).is_err());
    assert!(
        e.coerce(
            &Value::List(vec![Value::List(vec![])]),
            Operator::In
        )
        .is_err()
    );
}

#[test]
fn test_default_operator_sets() {
    assert_eq!(
        StringType::new().allowed_operators(),
        OperatorSet::of(&[
            Operator::Eq,
            Operator::Neq,
            Operator::Contains,
            Operator::StartsWith,
            Operator::EndsWith
        ])
    );
    assert_eq!(
        EnumType::<ReviewStatus>::new().allowed_operators(),
        OperatorSet::of(&[Operator::Eq, Operator::Neq, Operator::In, Operator::NotIn])
    );
    assert_eq!(BooleanType::new().allowed_operators().len(), 2);
    assert_eq!(IntegerType::new().allowed_operators().len(), 8);
}

// ============================================================================
// Schema construction
// ============================================================================

#[test]
fn test_schema_lookups() {
    let f = filters();
    let schema = f.schema();
    assert_eq!(schema.len(), 9);
    assert_eq!(schema.field("price").map(|d| d.id), Some(Field::Price));
    assert_eq!(schema.name_of(&Field::Tag), Some("tag"));
    assert_eq!(schema.field("created").map(|d| d.field_type.type_name()), Some("date"));
    let names: Vec<&str> = schema.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names[..3], ["title", "status", "score"]);
}

#[test]
fn test_duplicate_names_rejected() {
    let result = Schema::builder()
        .field(1, "a", StringType::new())
        .field(2, "a", IntegerType::new())
        .build();
    assert!(matches!(result, Err(FilterError::InvalidSchema { .. })));
}

#[test]
fn test_duplicate_ids_rejected() {
    let result = Schema::builder()
        .field(1, "a", StringType::new())
        .field(1, "b", IntegerType::new())
        .build();
    assert!(matches!(result, Err(FilterError::InvalidSchema { .. })));
}

#[test]
fn test_unwritable_names_rejected() {
    for name in ["", "two words", "and", "NOT", "1st", "a-b"] {
        let result = Schema::builder().field(1, name, StringType::new()).build();
        assert!(
            matches!(result, Err(FilterError::InvalidSchema { .. })),
            "name {:?} should be rejected",
            name
        );
    }
}
