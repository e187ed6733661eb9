//! Predicate filter engine: conjunctive field conditions over a [`Table`].
//!
//! Conditions are applied one after another, each narrowing the surviving rows, so the
//! result is the set of rows matching all of them in their original order. Evaluation is
//! lenient: unresolved fields and unknown operators pass every row, and
//! values that fail to coerce fall back to fixed answers instead of raising errors.
//! [`validate_conditions`] reports the same problems for callers that want strictness.

use crate::dates::{parse_date, parse_date_strict, parse_date_value, to_millis};
use crate::error::FilterError;
use crate::table::{DataType, Table};
use crate::value::{parse_numeric_literal, to_number, Value};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    Before,
    After,
    BeforeOrEqual,
    AfterOrEqual,
    IsNull,
    IsNotNull,
    /// Any operator string this engine does not know. Matches every row.
    #[serde(other)]
    Unknown,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::GreaterEqual => "greater_equal",
            FilterOperator::LessThan => "less_than",
            FilterOperator::LessEqual => "less_equal",
            FilterOperator::Before => "before",
            FilterOperator::After => "after",
            FilterOperator::BeforeOrEqual => "before_or_equal",
            FilterOperator::AfterOrEqual => "after_or_equal",
            FilterOperator::IsNull => "is_null",
            FilterOperator::IsNotNull => "is_not_null",
            FilterOperator::Unknown => "unknown",
        }
    }

    /// Whether the operator compares against the condition value at all.
    pub fn needs_value(&self) -> bool {
        !matches!(self, FilterOperator::IsNull | FilterOperator::IsNotNull)
    }

    /// Localized menu label. Temporal fields phrase equality and ordering as time words.
    pub fn label(&self, data_type: DataType) -> &'static str {
        match (self, data_type.is_temporal()) {
            (FilterOperator::Equals, true) => "是",
            (FilterOperator::Equals, false) => "等于",
            (FilterOperator::NotEquals, _) => "不等于",
            (FilterOperator::Contains, _) => "包含",
            (FilterOperator::NotContains, _) => "不包含",
            (FilterOperator::GreaterThan, _) => "大于",
            (FilterOperator::GreaterEqual, _) => "大于等于",
            (FilterOperator::LessThan, _) => "小于",
            (FilterOperator::LessEqual, _) => "小于等于",
            (FilterOperator::Before, _) => "之前",
            (FilterOperator::After, _) => "之后",
            (FilterOperator::BeforeOrEqual, _) => "之前（包含）",
            (FilterOperator::AfterOrEqual, _) => "之后（包含）",
            (FilterOperator::IsNull, _) => "为空",
            (FilterOperator::IsNotNull, _) => "不为空",
            (FilterOperator::Unknown, _) => "未知",
        }
    }
}

/// Operators offered in the condition editor for a data type, in menu order.
pub fn operators_for(data_type: DataType) -> &'static [FilterOperator] {
    use FilterOperator::*;
    match data_type {
        DataType::Text => &[Equals, NotEquals, Contains, NotContains, IsNull, IsNotNull],
        DataType::Number => &[
            Equals,
            NotEquals,
            GreaterThan,
            GreaterEqual,
            LessThan,
            LessEqual,
            IsNull,
            IsNotNull,
        ],
        DataType::Date | DataType::Datetime => &[
            IsNull,
            IsNotNull,
            Before,
            After,
            Equals,
            BeforeOrEqual,
            AfterOrEqual,
        ],
        DataType::Boolean | DataType::Select => &[Equals, NotEquals, IsNull, IsNotNull],
    }
}

fn lenient_condition_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::Text(s) => s,
        other => other.display_string(),
    })
}

/// One clause of a conjunctive filter chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field_id: String,
    pub operator: FilterOperator,
    #[serde(default, deserialize_with = "lenient_condition_value")]
    pub value: String,
}

impl FilterCondition {
    /// A fresh condition as the editor creates it: `equals` with an empty value.
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            operator: FilterOperator::Equals,
            value: String::new(),
        }
    }

    pub fn with(
        field_id: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Comparison rules for one family of data types.
pub trait Comparator {
    /// Operators this comparator evaluates. Anything else matches every row.
    fn operators(&self) -> &'static [FilterOperator];

    /// Test a raw row value (`None` when the row lacks the field) against a condition value.
    fn matches(&self, raw: Option<&Value>, condition: &str, operator: FilterOperator) -> bool;
}

fn is_null(raw: Option<&Value>) -> bool {
    matches!(raw, None | Some(Value::Null))
}

/// String comparison. Falsy row values compare as the empty string.
pub struct TextComparator;

impl Comparator for TextComparator {
    fn operators(&self) -> &'static [FilterOperator] {
        operators_for(DataType::Text)
    }

    fn matches(&self, raw: Option<&Value>, condition: &str, operator: FilterOperator) -> bool {
        let text = match raw {
            Some(v) if !v.is_falsy() => v.display_string(),
            _ => String::new(),
        };
        match operator {
            FilterOperator::Equals => text == condition,
            FilterOperator::NotEquals => text != condition,
            FilterOperator::Contains => text.contains(condition),
            FilterOperator::NotContains => !text.contains(condition),
            FilterOperator::IsNull => is_null(raw),
            FilterOperator::IsNotNull => !is_null(raw),
            _ => true,
        }
    }
}

/// Numeric comparison of coerced values. NaN never equals or orders against anything.
pub struct NumberComparator;

impl Comparator for NumberComparator {
    fn operators(&self) -> &'static [FilterOperator] {
        operators_for(DataType::Number)
    }

    fn matches(&self, raw: Option<&Value>, condition: &str, operator: FilterOperator) -> bool {
        let row = to_number(raw);
        let cond = parse_numeric_literal(condition);
        match operator {
            FilterOperator::Equals => row == cond,
            FilterOperator::NotEquals => row != cond,
            FilterOperator::GreaterThan => row > cond,
            FilterOperator::GreaterEqual => row >= cond,
            FilterOperator::LessThan => row < cond,
            FilterOperator::LessEqual => row <= cond,
            FilterOperator::IsNull => is_null(raw),
            FilterOperator::IsNotNull => !is_null(raw),
            _ => true,
        }
    }
}

/// Date comparison at millisecond precision. When either side fails to parse, only
/// `not_equals` matches.
pub struct TemporalComparator;

const TEMPORAL_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::Before,
    FilterOperator::After,
    FilterOperator::BeforeOrEqual,
    FilterOperator::AfterOrEqual,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

impl Comparator for TemporalComparator {
    fn operators(&self) -> &'static [FilterOperator] {
        TEMPORAL_OPERATORS
    }

    fn matches(&self, raw: Option<&Value>, condition: &str, operator: FilterOperator) -> bool {
        match operator {
            FilterOperator::IsNull => return is_null(raw),
            FilterOperator::IsNotNull => return !is_null(raw),
            op if !TEMPORAL_OPERATORS.contains(&op) => return true,
            _ => {}
        }
        let parsed = parse_date_value(raw).zip(parse_date(condition));
        let Some((row, cond)) = parsed else {
            return operator == FilterOperator::NotEquals;
        };
        let (row, cond) = (to_millis(&row), to_millis(&cond));
        match operator {
            FilterOperator::Equals => row == cond,
            FilterOperator::NotEquals => row != cond,
            FilterOperator::Before => row < cond,
            FilterOperator::After => row > cond,
            FilterOperator::BeforeOrEqual => row <= cond,
            FilterOperator::AfterOrEqual => row >= cond,
            _ => true,
        }
    }
}

/// The comparator for a field's data type. Booleans and selects compare as text.
pub fn comparator_for(data_type: DataType) -> &'static dyn Comparator {
    match data_type {
        DataType::Number => &NumberComparator,
        DataType::Date | DataType::Datetime => &TemporalComparator,
        DataType::Text | DataType::Boolean | DataType::Select => &TextComparator,
    }
}

/// Keep the rows of `table` that satisfy every condition.
///
/// Returns a new table with the same fields; row order is preserved.
pub fn apply_filters(table: &Table, conditions: &[FilterCondition]) -> Table {
    let mut candidates: Vec<usize> = (0..table.rows.len()).collect();

    for condition in conditions {
        let Some(field) = table.field_by_id(&condition.field_id) else {
            debug!(
                "Skipping condition on unknown field '{}'",
                condition.field_id
            );
            continue;
        };
        let comparator = comparator_for(field.effective_type());
        candidates.retain(|&i| {
            comparator.matches(
                table.rows[i].get(&field.field_name),
                &condition.value,
                condition.operator,
            )
        });
    }

    debug!(
        "Filter kept {} of {} rows using {} conditions",
        candidates.len(),
        table.rows.len(),
        conditions.len()
    );

    Table {
        fields: table.fields.clone(),
        rows: candidates.into_iter().map(|i| table.rows[i].clone()).collect(),
    }
}

/// Strict-mode check of a condition list against a table.
///
/// Returns the first problem found: an unresolved field, an unknown operator, an
/// operator the field's comparator does not evaluate, or a condition value that cannot
/// be parsed as a number or date where one is required.
pub fn validate_conditions(table: &Table, conditions: &[FilterCondition]) -> Result<(), FilterError> {
    for (index, condition) in conditions.iter().enumerate() {
        let field = table
            .field_by_id(&condition.field_id)
            .ok_or_else(|| FilterError::UnknownField {
                index,
                field_id: condition.field_id.clone(),
            })?;
        if condition.operator == FilterOperator::Unknown {
            return Err(FilterError::UnknownOperator { index });
        }
        let data_type = field.effective_type();
        if !comparator_for(data_type).operators().contains(&condition.operator) {
            return Err(FilterError::UnsupportedOperator {
                index,
                operator: condition.operator.as_str().to_string(),
                data_type: data_type.as_str().to_string(),
                field_name: field.field_name.clone(),
            });
        }
        if !condition.operator.needs_value() {
            continue;
        }
        match data_type {
            DataType::Number if parse_numeric_literal(&condition.value).is_nan() => {
                return Err(FilterError::InvalidNumber {
                    index,
                    value: condition.value.clone(),
                });
            }
            DataType::Date | DataType::Datetime => {
                parse_date_strict(&condition.value)
                    .map_err(|source| FilterError::InvalidDate { index, source })?;
            }
            _ => {}
        }
    }
    Ok(())
}
