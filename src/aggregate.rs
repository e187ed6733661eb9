//! Grouped descriptive statistics: count, sum, mean, min and max per bucket.

use crate::error::AnalysisError;
use crate::table::{DataType, FieldDescriptor, Table};
use crate::value::{to_number, Row, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label of the bucket holding rows whose group-by value is missing or null.
pub const MISSING_BUCKET_LABEL: &str = "空值";
/// Label of the single bucket used when no group-by field is set.
pub const ALL_ROWS_LABEL: &str = "全部";

/// Derived statistic columns, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Count,
    Sum,
    Mean,
    Min,
    Max,
}

impl Statistic {
    pub fn iterator() -> impl Iterator<Item = Statistic> {
        [
            Statistic::Count,
            Statistic::Sum,
            Statistic::Mean,
            Statistic::Min,
            Statistic::Max,
        ]
        .iter()
        .copied()
    }

    /// Suffix appended to the source field id.
    pub fn id_suffix(&self) -> &'static str {
        match self {
            Statistic::Count => "_count",
            Statistic::Sum => "_sum",
            Statistic::Mean => "_mean",
            Statistic::Min => "_min",
            Statistic::Max => "_max",
        }
    }

    /// Localized suffix appended to the source field name.
    pub fn name_suffix(&self) -> &'static str {
        match self {
            Statistic::Count => "_计数",
            Statistic::Sum => "_求和",
            Statistic::Mean => "_平均值",
            Statistic::Min => "_最小值",
            Statistic::Max => "_最大值",
        }
    }
}

/// Which field to group by and which fields to summarise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregationSpec {
    #[serde(default)]
    pub group_by_field_id: Option<String>,
    #[serde(default)]
    pub stats_field_ids: Vec<String>,
}

impl AggregationSpec {
    pub fn new(group_by_field_id: Option<String>, stats_field_ids: Vec<String>) -> Self {
        Self {
            group_by_field_id,
            stats_field_ids,
        }
    }
}

/// Internal bucket identity. A real value equal to the missing label stays its own bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Value(String),
    Missing,
    All,
}

impl BucketKey {
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => BucketKey::Missing,
            Some(v) => BucketKey::Value(v.display_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BucketKey::Value(s) => s,
            BucketKey::Missing => MISSING_BUCKET_LABEL,
            BucketKey::All => ALL_ROWS_LABEL,
        }
    }
}

/// Running summary of the numeric values seen for one field in one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    fn new(first: f64) -> Self {
        Self {
            count: 1,
            sum: first,
            min: first,
            max: first,
        }
    }

    fn push(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Mean rounded half away from zero to two decimals.
    pub fn mean(&self) -> f64 {
        round2(self.sum / self.count as f64)
    }

    pub fn get(&self, stat: Statistic) -> f64 {
        match stat {
            Statistic::Count => self.count as f64,
            Statistic::Sum => self.sum,
            Statistic::Mean => self.mean(),
            Statistic::Min => self.min,
            Statistic::Max => self.max,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Numeric value of a cell for statistics, `None` when it must be excluded.
fn stat_value(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => None,
        v => Some(to_number(v)).filter(|n| !n.is_nan()),
    }
}

/// Partition `table` by the group-by field and summarise each stats field.
///
/// Buckets appear in first-seen order. A field with no numeric values in a bucket
/// contributes no columns to that bucket's row. Stats ids that do not resolve are
/// ignored as long as at least one does.
pub fn aggregate(table: &Table, spec: &AggregationSpec) -> Result<Table, AnalysisError> {
    if spec.stats_field_ids.is_empty() {
        return Err(AnalysisError::NoStatsFields);
    }
    let group_field = spec
        .group_by_field_id
        .as_deref()
        .map(|id| {
            table
                .field_by_id(id)
                .ok_or_else(|| AnalysisError::UnknownGroupField(id.to_string()))
        })
        .transpose()?;
    let stats_fields: Vec<&FieldDescriptor> = table
        .fields
        .iter()
        .filter(|f| spec.stats_field_ids.contains(&f.field_id))
        .collect();
    if stats_fields.is_empty() {
        return Err(AnalysisError::NoResolvableStatsFields);
    }

    let mut buckets: IndexMap<BucketKey, Vec<Option<Summary>>> = IndexMap::new();
    for row in &table.rows {
        let key = match group_field {
            Some(field) => BucketKey::of(row.get(&field.field_name)),
            None => BucketKey::All,
        };
        let summaries = buckets
            .entry(key)
            .or_insert_with(|| vec![None; stats_fields.len()]);
        for (summary, field) in summaries.iter_mut().zip(&stats_fields) {
            let Some(x) = stat_value(row.get(&field.field_name)) else {
                continue;
            };
            match summary {
                Some(s) => s.push(x),
                None => *summary = Some(Summary::new(x)),
            }
        }
    }

    let mut fields = Vec::with_capacity(group_field.map_or(0, |_| 1) + stats_fields.len() * 5);
    if let Some(field) = group_field {
        fields.push(field.clone());
    }
    for field in &stats_fields {
        for stat in Statistic::iterator() {
            fields.push(
                FieldDescriptor::new(
                    format!("{}{}", field.field_id, stat.id_suffix()),
                    format!("{}{}", field.field_name, stat.name_suffix()),
                )
                .with_type(DataType::Number),
            );
        }
    }

    let rows: Vec<Row> = buckets
        .iter()
        .map(|(key, summaries)| {
            let mut row = Row::new();
            if let Some(field) = group_field {
                row.insert(field.field_name.clone(), Value::from(key.label()));
            }
            for (summary, field) in summaries.iter().zip(&stats_fields) {
                let Some(summary) = summary else {
                    continue;
                };
                for stat in Statistic::iterator() {
                    row.insert(
                        format!("{}{}", field.field_name, stat.name_suffix()),
                        Value::Number(summary.get(stat)),
                    );
                }
            }
            row
        })
        .collect();

    debug!(
        "Aggregated {} rows into {} buckets over {} fields",
        table.rows.len(),
        rows.len(),
        stats_fields.len()
    );

    Ok(Table { fields, rows })
}
