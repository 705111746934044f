// tests/roundtrip_tests.rs

use chrono::NaiveDate;
use filter_lang::schema::{
    BooleanType, DateTimeType, DateType, DecimalType, DynamicEnumType, EnumType, IntegerType,
    Schema, StringType, Symbolic, TypedValue,
};
use filter_lang::{Expression, FilterError, Operator, ParserOptions, TypedExpressionBuilder};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ReviewStatus {
    Draft,
    Published,
}

impl Symbolic for ReviewStatus {
    fn symbols() -> &'static [Self] {
        &[ReviewStatus::Draft, ReviewStatus::Published]
    }

    fn symbol(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "DRAFT",
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
    Team,
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
        .field(Field::Team, "team", DynamicEnumType::new(["core", "Data Platform"]))
        .build()
        .unwrap();
    TypedExpressionBuilder::new(schema)
}

fn term(field: Field, operator: Operator, value: impl Into<TypedValue>) -> Expression<Field> {
    Expression::term(field, operator, value)
}

fn symbol(s: ReviewStatus) -> TypedValue {
    TypedValue::Symbol(s.symbol().to_string())
}

fn sample_expressions() -> Vec<Expression<Field>> {
    let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    vec![
        term(Field::Title, Operator::Eq, "hello world"),
        term(Field::Title, Operator::Contains, ""),
        term(Field::Title, Operator::EndsWith, "a\\b (c) [d], AND e"),
        term(Field::Status, Operator::Eq, symbol(ReviewStatus::Draft)),
        term(
            Field::Status,
            Operator::In,
            TypedValue::List(vec![symbol(ReviewStatus::Draft), symbol(ReviewStatus::Published)]),
        ),
        term(Field::Status, Operator::NotIn, TypedValue::List(vec![])),
        term(Field::Score, Operator::Gte, 75i64),
        term(Field::Score, Operator::Lt, i64::MIN),
        term(Field::Score, Operator::In, vec![1i64, -2, 3]),
        term(Field::Price, Operator::Eq, 22.0),
        term(Field::Price, Operator::Gt, -0.125),
        term(Field::Price, Operator::Lte, 1e21),
        term(Field::Archived, Operator::Neq, true),
        term(Field::Created, Operator::Gte, day),
        term(Field::Updated, Operator::Lt, day.and_hms_milli_opt(9, 30, 5, 250).unwrap()),
        term(Field::Team, Operator::Eq, TypedValue::Symbol("Data Platform".to_string())),
        term(Field::Team, Operator::In, TypedValue::List(vec![TypedValue::Symbol("core".to_string())])),
        term(Field::Score, Operator::Eq, TypedValue::Null),
        term(Field::Score, Operator::Eq, 1i64).not(),
        term(Field::Score, Operator::Eq, 1i64).not().not(),
        term(Field::Score, Operator::Eq, 1i64)
            .or(term(Field::Score, Operator::Eq, 2i64))
            .and(term(Field::Archived, Operator::Eq, false)),
        Expression::all(vec![
            term(Field::Score, Operator::Eq, 1i64),
            Expression::all(vec![
                term(Field::Title, Operator::Eq, "x"),
                term(Field::Title, Operator::Eq, "y"),
            ]),
        ]),
        Expression::any(vec![
            term(Field::Score, Operator::Eq, 1i64).and(term(Field::Price, Operator::Eq, 2.5)),
            Expression::any(vec![
                term(Field::Title, Operator::StartsWith, "x"),
                term(Field::Title, Operator::EndsWith, "y"),
            ])
            .not(),
            term(Field::Status, Operator::Neq, symbol(ReviewStatus::Published)),
        ]),
    ]
}

#[test]
fn test_round_trip() {
    let f = filters();
    for expr in sample_expressions() {
        let text = f.serialise(&expr).unwrap();
        let back = f.deserialise(&text).unwrap();
        assert_eq!(back, expr, "Failed for text: {}", text);
    }
}

#[test]
fn test_serialise_is_canonical() {
    let f = filters();
    let once = f.deserialise("status is DRAFT and (score > 1 or score < -1)").unwrap();
    let text = f.serialise(&once).unwrap();
    assert_eq!(text, "(status = DRAFT AND (score > 1 OR score < -1))");
    let twice = f.serialise(&f.deserialise(&text).unwrap()).unwrap();
    assert_eq!(twice, text);
}

#[test]
fn test_list_round_trip() {
    let f = filters();
    let expr = f.deserialise("score IN [1,2,3]").unwrap();
    assert_eq!(f.serialise(&expr).unwrap(), "score IN [1,2,3]");
}

#[test]
fn test_string_scenario() {
    let f = filters();
    let expr = f.deserialise(r#"title = "active" AND score >= 75"#).unwrap();
    assert_eq!(f.serialise(&expr).unwrap(), r#"(title = "active" AND score >= 75)"#);
}

#[test]
fn test_value_rendering() {
    let f = filters();
    let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let cases = vec![
        (term(Field::Price, Operator::Eq, 22.0), "price = 22.0"),
        (term(Field::Created, Operator::Eq, day), "created = \"2024-01-31\""),
        (
            term(Field::Updated, Operator::Eq, day.and_hms_opt(7, 0, 0).unwrap()),
            "updated = \"2024-01-31T07:00:00\"",
        ),
        (
            term(Field::Team, Operator::Eq, TypedValue::Symbol("Data Platform".to_string())),
            "team = \"Data Platform\"",
        ),
        (term(Field::Archived, Operator::Eq, TypedValue::Null), "archived = null"),
    ];

    for (expr, expected) in cases {
        assert_eq!(f.serialise(&expr).unwrap(), expected);
    }
}

// ============================================================================
// Validation on serialise
// ============================================================================

#[test]
fn test_serialise_rejects_embedded_quote() {
    let expr = term(Field::Title, Operator::Eq, "say \"hi\"");
    assert!(matches!(
        filters().serialise(&expr),
        Err(FilterError::InvalidExpression { .. })
    ));
}

#[test]
fn test_serialise_rejects_short_combinators() {
    let f = filters();
    let empty: Expression<Field> = Expression::And(vec![]);
    assert!(matches!(f.serialise(&empty), Err(FilterError::InvalidExpression { .. })));
    let single = Expression::Or(vec![term(Field::Score, Operator::Eq, 1i64)]);
    assert!(matches!(f.serialise(&single), Err(FilterError::InvalidExpression { .. })));
}

#[test]
fn test_serialise_rejects_disallowed_operator() {
    let expr = term(Field::Status, Operator::Contains, symbol(ReviewStatus::Draft));
    assert!(matches!(
        filters().serialise(&expr),
        Err(FilterError::OperatorNotAllowed { .. })
    ));
}

#[test]
fn test_serialise_rejects_wrong_value_type() {
    let f = filters();
    // Integers given to a decimal field would come back as decimals.
    let expr = term(Field::Price, Operator::Eq, 3i64);
    assert!(matches!(f.serialise(&expr), Err(FilterError::ValueType { .. })));
    // An unknown enum symbol.
    let expr = term(Field::Status, Operator::Eq, TypedValue::Symbol("GONE".to_string()));
    assert!(matches!(f.serialise(&expr), Err(FilterError::ValueType { .. })));
    // Scalar under IN.
    let expr = term(Field::Score, Operator::In, 3i64);
    assert!(matches!(f.serialise(&expr), Err(FilterError::ValueType { .. })));
}

#[test]
fn test_serialise_rejects_field_outside_schema() {
    let small = TypedExpressionBuilder::new(
        Schema::builder()
            .field(Field::Title, "title", StringType::new())
            .build()
            .unwrap(),
    );
    let expr = term(Field::Score, Operator::Eq, 1i64);
    assert_eq!(
        small.serialise(&expr),
        Err(FilterError::UnknownField {
            field: "Score".to_string()
        })
    );
}

#[test]
fn test_options_apply_to_deserialise() {
    let f = filters().with_options(ParserOptions::default().max_input_len(10));
    assert!(matches!(
        f.deserialise("title = \"far too long\""),
        Err(FilterError::InputTooLong { .. })
    ));
}

// ============================================================================
// Nesting limits
// ============================================================================

/// `score = 0` wrapped `levels` times; a set bit negates, a clear bit adds a
/// connective with the previous text in parentheses.
fn nested_text(shape: u32, levels: u32) -> String {
    let mut text = "score = 0".to_string();
    for level in 0..levels {
        text = if shape.checked_shr(level).unwrap_or(0) & 1 != 0 {
            format!("NOT {}", text)
        } else {
            let connective = if level % 2 == 0 { "AND" } else { "OR" };
            format!("score = {} {} ({})", level + 1, connective, text)
        };
    }
    text
}

#[test]
fn test_long_negation_chain_round_trips() {
    let f = filters();
    let text = format!("{}score = 1", "NOT ".repeat(40));
    let expr = f.deserialise(&text).unwrap();
    let printed = f.serialise(&expr).unwrap();

    assert_eq!(printed, text);
    assert_eq!(f.deserialise(&printed).unwrap(), expr);
}

#[test]
fn test_nested_groups_round_trip_at_default_limit() {
    let f = filters();
    let text = nested_text(0, 64);
    let expr = f.deserialise(&text).unwrap();
    assert_eq!(expr.depth(), 65);

    let printed = f.serialise(&expr).unwrap();
    assert_eq!(f.deserialise(&printed).unwrap(), expr);

    assert!(f.deserialise(&nested_text(0, 65)).unwrap_err().is_syntax());
}

#[test]
fn test_unparenthesised_connectives_count_towards_limit() {
    let f = filters().with_options(ParserOptions::default().max_depth(4));

    let text = "score = 1 AND (score = 2 OR (score = 3 AND (score = 4 OR score = 5)))";
    let expr = f.deserialise(text).unwrap();
    let printed = f.serialise(&expr).unwrap();
    assert_eq!(
        printed,
        "(score = 1 AND (score = 2 OR (score = 3 AND (score = 4 OR score = 5))))"
    );
    assert_eq!(f.deserialise(&printed).unwrap(), expr);

    // Same parentheses, one more connective level.
    let deeper = format!("score = 0 OR {}", text);
    assert!(matches!(
        f.deserialise(&deeper),
        Err(FilterError::Parse(e)) if e.expected == "at most 4 levels of nesting"
    ));
}

#[test]
fn test_every_accepted_shape_round_trips() {
    let f = filters().with_options(ParserOptions::default().max_depth(3));
    let mut at_limit = 0;

    for levels in 0..=6 {
        for shape in 0..(1u32 << levels) {
            let text = nested_text(shape, levels);
            match f.deserialise(&text) {
                Ok(expr) => {
                    let printed = f.serialise(&expr).unwrap();
                    let back = f.deserialise(&printed).unwrap();
                    assert_eq!(back, expr, "Failed for text: {}", text);
                    if expr.depth() == 4 {
                        at_limit += 1;
                    }
                }
                Err(e) => assert!(e.is_syntax(), "Failed for text: {}: {}", text, e),
            }
        }
    }

    assert!(at_limit > 0);
}

#[test]
fn test_serialise_rejects_expression_over_limit() {
    let f = filters().with_options(ParserOptions::default().max_depth(2));
    let mut expr = term(Field::Score, Operator::Eq, 1i64);
    assert!(f.serialise(&expr.clone().not().not()).is_ok());

    for _ in 0..3 {
        expr = expr.not();
    }
    assert!(matches!(
        f.serialise(&expr),
        Err(FilterError::InvalidExpression { .. })
    ));
}
