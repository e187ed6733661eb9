use serde_json::json;
use snaplens::filter::{apply_filters, validate_conditions, FilterCondition, FilterOperator};
use snaplens::{FilterError, Value};

mod common;

fn regions(table: &snaplens::Table) -> Vec<Value> {
    table
        .rows
        .iter()
        .map(|r| r.get("region").cloned().unwrap_or_default())
        .collect()
}

#[test]
fn test_number_greater_than() {
    let table = common::sales_table();
    let filtered = apply_filters(
        &table,
        &[FilterCondition::with("f_amount", FilterOperator::GreaterThan, "10")],
    );
    assert_eq!(filtered.row_count(), 2);
    assert_eq!(filtered.fields, table.fields);
    assert_eq!(
        filtered.rows[1]["amount"],
        Value::from(30.5),
        "rows keep their original order"
    );
}

#[test]
fn test_number_equals_never_matches_unparseable() {
    let table = common::sales_table();
    // "n/a" and "abc" both coerce to NaN, which is never equal to itself
    let filtered = apply_filters(
        &table,
        &[FilterCondition::with("f_amount", FilterOperator::Equals, "abc")],
    );
    assert!(filtered.is_empty());
}

#[test]
fn test_date_before_boundary() {
    let table = common::sales_table();
    let filtered = apply_filters(
        &table,
        &[FilterCondition::with("f_day", FilterOperator::Before, "2024-01-01")],
    );
    assert_eq!(filtered.row_count(), 1);
    assert_eq!(filtered.rows[0]["day"], Value::from("2023-12-31 10:00"));
}

#[test]
fn test_text_and_null_conditions_chain() {
    let table = common::sales_table();
    let conditions = vec![
        FilterCondition::with("f_region", FilterOperator::IsNotNull, ""),
        FilterCondition::with("f_region", FilterOperator::NotContains, "th"),
    ];
    let filtered = apply_filters(&table, &conditions);
    assert_eq!(regions(&filtered), vec![Value::from("east")]);
}

#[test]
fn test_boolean_field_compares_as_text() {
    let table = common::sales_table();
    let filtered = apply_filters(
        &table,
        &[FilterCondition::with("f_paid", FilterOperator::Equals, "true")],
    );
    assert_eq!(filtered.row_count(), 2);
}

#[test]
fn test_conditions_from_json() {
    let table = common::sales_table();
    let conditions: Vec<FilterCondition> = serde_json::from_value(json!([
        {"field_id": "f_amount", "operator": "less_equal", "value": 8},
        {"field_id": "missing", "operator": "equals", "value": "x"},
        {"field_id": "f_region", "operator": "regex", "value": "^n"}
    ]))
    .unwrap();
    assert_eq!(conditions[2].operator, FilterOperator::Unknown);

    let filtered = apply_filters(&table, &conditions);
    assert_eq!(
        regions(&filtered),
        vec![Value::from("south"), Value::from("east")]
    );
}

#[test]
fn test_strict_validation_reports_first_problem() {
    let table = common::sales_table();

    let ok = [FilterCondition::with("f_day", FilterOperator::After, "2024-01-01")];
    assert!(validate_conditions(&table, &ok).is_ok());

    let unknown_field = [FilterCondition::with("nope", FilterOperator::Equals, "")];
    assert!(matches!(
        validate_conditions(&table, &unknown_field),
        Err(FilterError::UnknownField { index: 0, .. })
    ));

    let wrong_operator = [
        FilterCondition::with("f_amount", FilterOperator::Equals, "1"),
        FilterCondition::with("f_amount", FilterOperator::Before, "1"),
    ];
    assert!(matches!(
        validate_conditions(&table, &wrong_operator),
        Err(FilterError::UnsupportedOperator { index: 1, .. })
    ));

    let bad_number = [FilterCondition::with("f_amount", FilterOperator::GreaterThan, "ten")];
    assert!(matches!(
        validate_conditions(&table, &bad_number),
        Err(FilterError::InvalidNumber { .. })
    ));

    let bad_date = [FilterCondition::with("f_day", FilterOperator::Before, "someday")];
    assert!(matches!(
        validate_conditions(&table, &bad_date),
        Err(FilterError::InvalidDate { .. })
    ));
}
