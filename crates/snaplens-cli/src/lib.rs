//! Shared CLI definitions for snaplens.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// File format for tabular data imports (used to bypass extension-based detection).
/// When `--format` is not specified, format is auto-detected from the file extension.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileFormat {
    /// Parquet columnar format
    Parquet,
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Pipe-separated values
    Psv,
    /// JSON Lines / NDJSON (one JSON object per line)
    Jsonl,
}

impl FileFormat {
    /// Detect file format from path extension. Returns None when extension is missing or unknown.
    ///
    /// A trailing compression extension is skipped, so `sales.csv.gz` is detected as CSV.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem_path;
        let path = if CompressionFormat::from_extension(path).is_some() {
            stem_path = path.with_extension("");
            stem_path.as_path()
        } else {
            path
        };
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse format from extension string (e.g. "parquet", "csv").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "parquet" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "psv" => Some(Self::Psv),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            _ => None,
        }
    }

    /// Default field separator for the delimited text formats.
    pub fn default_delimiter(&self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            Self::Psv => Some(b'|'),
            Self::Parquet | Self::Jsonl => None,
        }
    }
}

/// Compression format for snapshot and data files
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Gzip compression (.gz) - Most common, good balance of speed and compression
    Gzip,
    /// Zstandard compression (.zst) - Modern, fast compression with good ratios
    Zstd,
    /// Bzip2 compression (.bz2) - Good compression ratio, slower than gzip
    Bzip2,
    /// XZ compression (.xz) - Excellent compression ratio, slower than bzip2
    Xz,
}

impl CompressionFormat {
    /// Detect compression format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            match ext.to_lowercase().as_str() {
                "gz" => Some(Self::Gzip),
                "zst" | "zstd" => Some(Self::Zstd),
                "bz2" | "bz" => Some(Self::Bzip2),
                "xz" => Some(Self::Xz),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Get file extension for this compression format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Zstd => "zst",
            Self::Bzip2 => "bz2",
            Self::Xz => "xz",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines on stderr
    Pretty,
    /// One JSON object per event on stderr
    Json,
}

/// Command-line arguments for snaplens
#[derive(Clone, Parser, Debug)]
#[command(
    name = "snaplens",
    version,
    about = "Filter, aggregate and chart tabular snapshots",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Specify the compression format of input files explicitly (gzip, zstd, bzip2, xz).
    /// If not specified, compression is auto-detected from file extension.
    #[arg(long = "compression", value_enum, global = true)]
    pub compression: Option<CompressionFormat>,

    /// Enable debug logging (overrides RUST_LOG and config [logging] level)
    #[arg(long = "debug", action, global = true)]
    pub debug: bool,

    /// Log output format (default: pretty, or config [logging] format)
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Pretty-print JSON output (overrides config [output] pretty)
    #[arg(long = "pretty", action, global = true)]
    pub pretty: bool,

    /// Generate default configuration file at ~/.config/snaplens/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Operations on a snapshot
#[derive(Clone, Subcommand, Debug)]
pub enum Command {
    /// Keep only the rows of a snapshot matching every filter condition
    Filter {
        /// Snapshot JSON document ({"fields": [...], "rows": [...]})
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// JSON array of filter conditions ({"field_id", "operator", "value"})
        #[arg(long = "conditions", value_name = "FILE")]
        conditions: PathBuf,

        /// JSON array of enabled field descriptors used to fill in missing data types
        #[arg(long = "fields", value_name = "FILE")]
        fields: Option<PathBuf>,

        /// Reject unresolved fields, unsupported operators and unparseable values instead of ignoring them
        #[arg(long = "strict", action)]
        strict: bool,

        /// Write the filtered snapshot here instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compute count/sum/mean/min/max per group
    Aggregate {
        /// Snapshot JSON document
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Field id to compute statistics for. Use once per field
        #[arg(long = "stats", value_name = "FIELD_ID", required = true)]
        stats: Vec<String>,

        /// Field id to group rows by. When omitted all rows form one group
        #[arg(long = "group-by", value_name = "FIELD_ID")]
        group_by: Option<String>,

        /// JSON array of enabled field descriptors used to fill in missing data types
        #[arg(long = "fields", value_name = "FILE")]
        fields: Option<PathBuf>,

        /// Write the aggregated snapshot here instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Map snapshot rows onto chart options for an external renderer
    Chart {
        /// Snapshot JSON document
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Chart kind (line, bar, pie, scatter, radar, funnel, gauge, heatmap, bar3d,
        /// scatter3d, surface3d, stacked_line, stacked_bar, multiple_y, linked, led_wafer).
        /// Default: config [chart] default_kind
        #[arg(long = "kind", value_name = "KIND")]
        kind: Option<String>,

        /// JSON object of chart options (xAxisField, yAxisField, colorScheme, ...)
        #[arg(long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the chart options here instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert a CSV/TSV/PSV, Parquet or JSON Lines file into a snapshot
    Import {
        /// Data file to import
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Force file format (parquet, csv, tsv, psv, jsonl).
        /// By default format is auto-detected from the file extension.
        #[arg(long = "format", value_enum)]
        format: Option<FileFormat>,

        /// Specify the delimiter to use when reading a delimited text file
        #[arg(long = "delimiter")]
        delimiter: Option<u8>,

        /// Specify that the file has no header
        #[arg(long = "no-header", action)]
        no_header: bool,

        /// Skip this many rows when reading a delimited text file
        #[arg(long = "skip-rows")]
        skip_rows: Option<usize>,

        /// Write the snapshot here instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the distinct values of a field, as offered for filter suggestions
    Values {
        /// Snapshot JSON document
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Field id to list values for
        #[arg(long = "field", value_name = "FIELD_ID")]
        field: String,

        /// Maximum number of values (default: config [analysis] unique_values_limit)
        #[arg(long = "limit")]
        limit: Option<usize>,
    },

    /// List the filter operators offered for a data type
    Operators {
        /// Data type (text, number, date, datetime, boolean, select)
        #[arg(value_name = "DATA_TYPE")]
        data_type: String,
    },
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn render_arguments(cmd: &clap::Command, out: &mut String) {
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if !arg.get_action().takes_values() || placeholder.is_empty() {
                op
            } else {
                format!("{op} {placeholder}")
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }
}

/// Render command-line options as markdown, one table per subcommand.
///
/// Used by the gen_docs binary; output is written to stdout.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    out.push_str(&cmd.render_usage().to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Global Options\n\n");
    render_arguments(&cmd, &mut out);

    for sub in cmd.get_subcommands() {
        if sub.get_name() == "help" {
            continue;
        }
        out.push_str(&format!("\n## `{}`\n\n", sub.get_name()));
        if let Some(about) = sub.get_about() {
            out.push_str(&format!("{about}\n\n"));
        }
        render_arguments(sub, &mut out);
    }

    out
}
