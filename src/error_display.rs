//! User-facing error message formatting.
//!
//! Matches on typed errors (io::ErrorKind, serde_json categories, PolarsError variants)
//! found in a report's cause chain instead of parsing display strings.

use crate::error::{AnalysisError, FilterError};
use color_eyre::eyre::Report;
use polars::prelude::PolarsError;
use std::io;
use std::path::Path;

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::AlreadyExists => "File already exists.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Interrupted => "Operation interrupted.".to_string(),
        ErrorKind::OutOfMemory => "Out of memory.".to_string(),
        ErrorKind::Other => {
            let msg = err.to_string();
            if msg.contains("No space left") {
                return "No space left on device. Free up disk space and try again.".to_string();
            }
            if msg.contains("Is a directory") {
                return "Path is a directory, not a file.".to_string();
            }
            return msg;
        }
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Format a JSON error by its category, keeping the line and column.
pub fn user_message_from_json(err: &serde_json::Error) -> String {
    use serde_json::error::Category;

    match err.classify() {
        Category::Io => "Could not read JSON input.".to_string(),
        Category::Syntax => format!(
            "Invalid JSON at line {}, column {}.",
            err.line(),
            err.column()
        ),
        Category::Eof => "JSON input ended unexpectedly. Is the file truncated?".to_string(),
        Category::Data => format!("JSON has an unexpected shape: {}", err),
    }
}

/// Format a PolarsError raised while importing a data file.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!("Column not found: {}.", msg),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::ComputeError(msg) => format!("Could not read the file: {}", msg),
        PE::Context { error, msg } => {
            format!("{}: {}", msg, user_message_from_polars(error))
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Format a report by downcasting the causes to known error types.
///
/// When `path` is given the message is prefixed with the file that failed.
pub fn user_message_from_report(report: &Report, path: Option<&Path>) -> String {
    let with_path = |msg: String| match path {
        Some(p) => format!("Failed to load {}: {}", p.display(), msg),
        None => msg,
    };

    for cause in report.chain() {
        if let Some(e) = cause.downcast_ref::<FilterError>() {
            return format!("Invalid filter: {}", e);
        }
        if let Some(e) = cause.downcast_ref::<AnalysisError>() {
            return format!("Cannot aggregate: {}", e);
        }
        if let Some(e) = cause.downcast_ref::<serde_json::Error>() {
            return with_path(user_message_from_json(e));
        }
        if let Some(e) = cause.downcast_ref::<PolarsError>() {
            return with_path(user_message_from_polars(e));
        }
        if let Some(e) = cause.downcast_ref::<io::Error>() {
            return with_path(user_message_from_io(e, None));
        }
    }

    // Fallback: first line of the display, no traceback
    let display = report.to_string();
    let first_line = display.lines().next().unwrap_or("An error occurred").trim();
    with_path(first_line.to_string())
}
