//! Filtering, grouped aggregation and chart option mapping for tabular snapshots.
//!
//! A snapshot is a [`Table`]: an ordered list of [`FieldDescriptor`]s plus rows keyed by
//! field name. [`apply_filters`] keeps the rows matching every [`FilterCondition`],
//! [`aggregate`] computes count/sum/mean/min/max per group, and [`map_chart`] turns rows
//! into renderer-ready [`ChartOptions`].

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dates;
pub mod error;
pub mod error_display;
pub mod filter;
pub mod import;
pub mod logging;
pub mod snapshot;
pub mod table;
pub mod value;

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "snaplens";

pub use snaplens_cli::{Args, Command, CompressionFormat, FileFormat, LogFormat};

pub use aggregate::{aggregate, AggregationSpec, Statistic};
pub use chart::{map_chart, ChartConfig, ChartKind, ChartOptions, ColorScheme};
pub use config::{AppConfig, ConfigManager};
pub use error::{AnalysisError, DateParseError, FilterError};
pub use filter::{apply_filters, validate_conditions, FilterCondition, FilterOperator};
pub use import::{import_table, ImportOptions};
pub use table::{DataType, FieldDescriptor, Table};
pub use value::{Row, Value};
