//! Typed errors for the analysis engines.
//!
//! The lenient engine paths never produce these; they are returned by validation
//! helpers and by operations with preconditions a caller can violate.

use thiserror::Error;

/// A date string that none of the supported formats accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date value")]
    Empty,
    #[error("unrecognised date format: '{0}'")]
    Unrecognized(String),
}

/// Problems found when validating filter conditions in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("condition {index}: no field with id '{field_id}'")]
    UnknownField { index: usize, field_id: String },
    #[error("condition {index}: operator is not recognised")]
    UnknownOperator { index: usize },
    #[error("condition {index}: operator '{operator}' is not available for {data_type} field '{field_name}'")]
    UnsupportedOperator {
        index: usize,
        operator: String,
        data_type: String,
        field_name: String,
    },
    #[error("condition {index}: '{value}' is not a number")]
    InvalidNumber { index: usize, value: String },
    #[error("condition {index}: {source}")]
    InvalidDate {
        index: usize,
        #[source]
        source: DateParseError,
    },
}

/// Aggregation preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("select at least one field to compute statistics for")]
    NoStatsFields,
    #[error("none of the selected statistics fields exist in the table")]
    NoResolvableStatsFields,
    #[error("group-by field '{0}' does not exist in the table")]
    UnknownGroupField(String),
}
