// tests/evaluator_tests.rs

use filter_lang::evaluator::compile;
use filter_lang::schema::{DateType, DecimalType, Schema, StringType};
use filter_lang::{EvaluatorOptions, TypedExpressionBuilder, parse};
use serde_json::{Value, json};

fn records() -> Vec<Value> {
    vec![
        json!({"id": 1, "status": "active", "score": 80, "name": "Alice Smith", "tags": ["vip", "beta"], "joined": "2023-05-01"}),
        json!({"id": 2, "status": "inactive", "score": 75.0, "name": "bob jones", "tags": [], "joined": "2024-01-15"}),
        json!({"id": 3, "status": "active", "score": 12.5, "name": "Carol Smith", "joined": "2022-11-30"}),
        json!({"id": 4, "status": null, "name": "Dan"}),
    ]
}

fn ids(filter: &str) -> Vec<i64> {
    ids_with(filter, EvaluatorOptions::default())
}

fn ids_with(filter: &str, options: EvaluatorOptions) -> Vec<i64> {
    let matches = compile(&parse(filter).unwrap(), options);
    records()
        .iter()
        .filter(|r| matches(r))
        .filter_map(|r| r["id"].as_i64())
        .collect()
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_equality() {
    assert_eq!(ids(r#"status = "active""#), vec![1, 3]);
    assert_eq!(ids("status = active"), vec![1, 3]);
    assert_eq!(ids(r#"status != "active""#), vec![2, 4]);
}

#[test]
fn test_numbers_compare_across_kinds() {
    assert_eq!(ids("score = 75"), vec![2]);
    assert_eq!(ids("score >= 75"), vec![1, 2]);
    assert_eq!(ids("score < 75.0"), vec![3]);
    assert_eq!(ids("score <= 12.5"), vec![3]);
    assert_eq!(ids("score > 12"), vec![1, 2, 3]);
}

#[test]
fn test_missing_field_is_null() {
    assert_eq!(ids("score = null"), vec![4]);
    assert_eq!(ids("status = null"), vec![4]);
    assert_eq!(ids("nickname = null"), vec![1, 2, 3, 4]);
    // Ordering against null never matches.
    assert_eq!(ids("score < 1000"), vec![1, 2, 3]);
}

#[test]
fn test_membership() {
    assert_eq!(ids("id IN [1, 3, 99]"), vec![1, 3]);
    assert_eq!(ids("id NOT IN [1, 3]"), vec![2, 4]);
    assert_eq!(ids("status IN [active, null]"), vec![1, 3, 4]);
    assert_eq!(ids("id IN []"), Vec::<i64>::new());
}

#[test]
fn test_string_operators() {
    assert_eq!(ids(r#"name CONTAINS "Smith""#), vec![1, 3]);
    assert_eq!(ids(r#"name STARTS WITH "Car""#), vec![3]);
    assert_eq!(ids(r#"name ENDS WITH "jones""#), vec![2]);
    assert_eq!(ids(r#"score CONTAINS "8""#), Vec::<i64>::new());
}

#[test]
fn test_contains_on_arrays() {
    assert_eq!(ids("tags CONTAINS vip"), vec![1]);
    assert_eq!(ids("tags CONTAINS gold"), Vec::<i64>::new());
}

#[test]
fn test_case_sensitivity_is_configurable() {
    assert_eq!(ids(r#"name STARTS WITH "bob""#), vec![2]);
    assert_eq!(ids(r#"name STARTS WITH "BOB""#), Vec::<i64>::new());
    let folded = EvaluatorOptions::default().case_insensitive(true);
    assert_eq!(ids_with(r#"name STARTS WITH "BOB""#, folded), vec![2]);
    assert_eq!(ids_with(r#"name CONTAINS "SMITH""#, folded), vec![1, 3]);
    // Equality is never folded.
    assert_eq!(ids_with(r#"status = "ACTIVE""#, folded), Vec::<i64>::new());
}

#[test]
fn test_iso_dates_order_as_text() {
    assert_eq!(ids(r#"joined >= "2023-01-01""#), vec![1, 2]);
}

// ============================================================================
// Connectives
// ============================================================================

#[test]
fn test_connectives() {
    assert_eq!(ids(r#"status = "active" AND score >= 75"#), vec![1]);
    assert_eq!(ids("id = 1 OR id = 4"), vec![1, 4]);
    assert_eq!(ids("NOT status = active"), vec![2, 4]);
    assert_eq!(ids("id = 1 OR id = 2 AND score > 100"), vec![1]);
    assert_eq!(ids("(id = 1 OR id = 2) AND score > 76"), vec![1]);
}

#[test]
fn test_non_object_records_see_only_nulls() {
    let matches = compile(&parse("a = null").unwrap(), EvaluatorOptions::default());
    assert!(matches(&json!(42)));
    assert!(matches(&json!([1, 2])));
}

#[test]
fn test_predicates_are_shareable() {
    let matches = compile(&parse("id > 1").unwrap(), EvaluatorOptions::default());
    let handle = std::thread::spawn(move || matches(&json!({"id": 2})));
    assert!(handle.join().unwrap());
}

// ============================================================================
// Typed expressions
// ============================================================================

#[test]
fn test_typed_predicate() {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Field {
        Name,
        Score,
        Joined,
    }

    let filters = TypedExpressionBuilder::new(
        Schema::builder()
            .field(Field::Name, "name", StringType::new())
            .field(Field::Score, "score", DecimalType::new())
            .field(Field::Joined, "joined", DateType::new())
            .build()
            .unwrap(),
    );

    let expr = filters
        .deserialise(r#"name ENDS WITH "Smith" AND score > 50 AND joined < "2024-01-01""#)
        .unwrap();
    let matches = filters.predicate(&expr, EvaluatorOptions::default());

    let selected: Vec<i64> = records()
        .iter()
        .filter(|r| matches(r))
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert_eq!(selected, vec![1]);
}
