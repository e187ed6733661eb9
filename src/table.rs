//! Field metadata and the `Table` unit passed between the engines.

use crate::value::{Row, Value, ValueKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default cap on value suggestions offered while editing a condition.
pub const DEFAULT_UNIQUE_VALUES_LIMIT: usize = 50;

/// Declared type of a field. Selects the comparator set used by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Date,
    Datetime,
    Boolean,
    Select,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Boolean => "boolean",
            DataType::Select => "select",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(DataType::Text),
            "number" => Some(DataType::Number),
            "date" => Some(DataType::Date),
            "datetime" => Some(DataType::Datetime),
            "boolean" => Some(DataType::Boolean),
            "select" => Some(DataType::Select),
            _ => None,
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Datetime)
    }

    pub fn iterator() -> impl Iterator<Item = DataType> {
        [
            DataType::Text,
            DataType::Number,
            DataType::Date,
            DataType::Datetime,
            DataType::Boolean,
            DataType::Select,
        ]
        .iter()
        .copied()
    }
}

/// Deserializes a data type leniently: absent, null or unrecognised strings become `None`.
fn lenient_data_type<'de, D>(deserializer: D) -> Result<Option<DataType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(DataType::parse))
}

/// Metadata for one column. `field_name` is the key used to read row values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field_id: String,
    pub field_name: String,
    #[serde(
        default,
        deserialize_with = "lenient_data_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_type: Option<DataType>,
}

impl FieldDescriptor {
    pub fn new(field_id: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            field_name: field_name.into(),
            data_type: None,
        }
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// The declared type, `Text` when none is declared.
    pub fn effective_type(&self) -> DataType {
        self.data_type.unwrap_or(DataType::Text)
    }
}

/// An ordered field list plus ordered rows sharing that schema.
///
/// Engines take a `&Table` and return a new one; the input is never modified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(fields: Vec<FieldDescriptor>, rows: Vec<Row>) -> Self {
        Self { fields, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn field_by_id(&self, field_id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    pub fn field_by_name(&self, field_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    /// Values of one field across all rows, in row order; `None` where the row lacks it.
    pub fn column<'a>(&'a self, field_name: &'a str) -> impl Iterator<Item = Option<&'a Value>> {
        self.rows.iter().map(move |row| row.get(field_name))
    }

    /// Distinct non-null values of a field in encounter order, at most `limit` of them.
    pub fn unique_values(&self, field_name: &str, limit: usize) -> Vec<Value> {
        let mut seen: HashSet<ValueKey> = HashSet::new();
        let mut out = Vec::new();
        for value in self.column(field_name).flatten() {
            if out.len() >= limit {
                break;
            }
            if value.is_null() {
                continue;
            }
            if seen.insert(value.key()) {
                out.push(value.clone());
            }
        }
        out
    }

    /// Fill in missing field types from an "enabled fields" lookup keyed by `field_id`.
    ///
    /// A type declared by the table itself wins; a field found in neither stays
    /// untyped and is treated as text by the engines.
    pub fn with_enabled_field_types(&self, enabled: &[FieldDescriptor]) -> Table {
        let lookup: HashMap<&str, DataType> = enabled
            .iter()
            .filter_map(|f| f.data_type.map(|t| (f.field_id.as_str(), t)))
            .collect();
        let fields = self
            .fields
            .iter()
            .map(|f| FieldDescriptor {
                data_type: f
                    .data_type
                    .or_else(|| lookup.get(f.field_id.as_str()).copied())
                    .or(Some(DataType::Text)),
                ..f.clone()
            })
            .collect();
        Table {
            fields,
            rows: self.rows.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        serde_json::from_value(json!({
            "fields": [
                {"field_id": "f1", "field_name": "city", "data_type": "text"},
                {"field_id": "f2", "field_name": "amount"},
                {"field_id": "f3", "field_name": "when", "data_type": "unknown"}
            ],
            "rows": [
                {"city": "Oslo", "amount": 3},
                {"city": null, "amount": 4},
                {"city": "Oslo", "amount": 5},
                {"amount": 6},
                {"city": "Rome", "amount": 7}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn lenient_type_parsing() {
        let t = sample();
        assert_eq!(t.fields[0].data_type, Some(DataType::Text));
        assert_eq!(t.fields[1].data_type, None);
        assert_eq!(t.fields[2].data_type, None);
        assert_eq!(t.fields[2].effective_type(), DataType::Text);
    }

    #[test]
    fn unique_values_skip_nulls_and_keep_order() {
        let t = sample();
        assert_eq!(
            t.unique_values("city", DEFAULT_UNIQUE_VALUES_LIMIT),
            vec![Value::from("Oslo"), Value::from("Rome")]
        );
        assert_eq!(t.unique_values("city", 1), vec![Value::from("Oslo")]);
    }

    #[test]
    fn enabled_fields_overlay_only_missing_types() {
        let t = sample();
        let enabled = vec![
            FieldDescriptor::new("f1", "city").with_type(DataType::Select),
            FieldDescriptor::new("f2", "amount").with_type(DataType::Number),
        ];
        let enriched = t.with_enabled_field_types(&enabled);
        assert_eq!(enriched.fields[0].data_type, Some(DataType::Text));
        assert_eq!(enriched.fields[1].data_type, Some(DataType::Number));
        assert_eq!(enriched.fields[2].data_type, Some(DataType::Text));
        assert_eq!(enriched.rows, t.rows);
        assert_eq!(t.fields[1].data_type, None);
    }

    #[test]
    fn field_lookup() {
        let t = sample();
        assert_eq!(t.field_by_id("f2").map(|f| f.field_name.as_str()), Some("amount"));
        assert!(t.field_by_id("amount").is_none());
        assert_eq!(t.field_by_name("city").map(|f| f.field_id.as_str()), Some("f1"));
    }
}
