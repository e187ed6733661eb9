//! Import delimited text, Parquet and JSON Lines files as snapshot tables.

use crate::snapshot::read_decoded;
use crate::table::{DataType, FieldDescriptor, Table};
use crate::value::{Row, Value};
use crate::{CompressionFormat, FileFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// How to read a data file.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Format; detected from the extension when `None`.
    pub format: Option<FileFormat>,
    /// Compression; detected from the extension when `None`.
    pub compression: Option<CompressionFormat>,
    /// Field separator for delimited text; the format's default when `None`.
    pub delimiter: Option<u8>,
    /// Whether delimited text starts with a header row. `None` means it does.
    pub has_header: Option<bool>,
    pub skip_rows: Option<usize>,
}

impl ImportOptions {
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = Some(skip_rows);
        self
    }
}

/// Read `path` into a table. Field ids and names are the column names.
pub fn import_table(path: &Path, options: &ImportOptions) -> Result<Table> {
    let format = options
        .format
        .or_else(|| FileFormat::from_path(path))
        .ok_or_else(|| {
            eyre!(
                "cannot detect the format of '{}'; pass --format",
                path.display()
            )
        })?;
    let compression = options
        .compression
        .or_else(|| CompressionFormat::from_extension(path));

    let df = match format {
        FileFormat::Parquet => {
            if compression.is_some() {
                return Err(eyre!("Parquet files cannot be read from a compressed stream"));
            }
            let pl_path = PlPath::Local(Arc::from(path));
            LazyFrame::scan_parquet(pl_path, Default::default())?.collect()?
        }
        FileFormat::Csv | FileFormat::Tsv | FileFormat::Psv => {
            read_delimited(path, format, compression, options)?
        }
        FileFormat::Jsonl => {
            let bytes = read_decoded(path, compression)?;
            JsonReader::new(Cursor::new(bytes))
                .with_json_format(JsonFormat::JsonLines)
                .finish()?
        }
    };
    let table = table_from_dataframe(&df)?;
    debug!(
        "Imported {} as {:?}: {} columns, {} rows",
        path.display(),
        format,
        table.fields.len(),
        table.rows.len()
    );
    Ok(table)
}

fn read_delimited(
    path: &Path,
    format: FileFormat,
    compression: Option<CompressionFormat>,
    options: &ImportOptions,
) -> Result<DataFrame> {
    let separator = options
        .delimiter
        .or_else(|| format.default_delimiter())
        .unwrap_or(b',');
    let has_header = options.has_header.unwrap_or(true);
    let skip_rows = options.skip_rows.unwrap_or(0);

    if compression.is_none() {
        let pl_path = PlPath::Local(Arc::from(path));
        let df = LazyCsvReader::new(pl_path)
            .with_separator(separator)
            .with_has_header(has_header)
            .with_skip_rows(skip_rows)
            .with_try_parse_dates(true)
            .finish()?
            .collect()?;
        return Ok(df);
    }

    let bytes = read_decoded(path, compression)?;
    let read_options = CsvReadOptions::default()
        .with_has_header(has_header)
        .with_skip_rows(skip_rows)
        .map_parse_options(|opts| opts.with_separator(separator).with_try_parse_dates(true));
    Ok(CsvReader::new(Cursor::new(bytes))
        .with_options(read_options)
        .finish()?)
}

/// Snapshot data type of a column dtype.
pub fn data_type_of(dtype: &polars::prelude::DataType) -> DataType {
    use polars::prelude::DataType as Pl;
    match dtype {
        Pl::Boolean => DataType::Boolean,
        Pl::Date => DataType::Date,
        Pl::Datetime(_, _) => DataType::Datetime,
        d if d.is_integer() || d.is_float() => DataType::Number,
        _ => DataType::Text,
    }
}

fn cell_value(value: AnyValue<'_>, data_type: DataType) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::Text(s.to_string()),
        v if data_type == DataType::Number => v
            .extract::<f64>()
            .map_or(Value::Null, Value::Number),
        v => Value::Text(v.str_value().into_owned()),
    }
}

/// Convert a collected frame into a table, one field per column.
pub fn table_from_dataframe(df: &DataFrame) -> Result<Table> {
    let columns = df.get_columns();
    let fields: Vec<FieldDescriptor> = columns
        .iter()
        .map(|c| {
            let name = c.name().to_string();
            FieldDescriptor::new(name.clone(), name).with_type(data_type_of(c.dtype()))
        })
        .collect();

    let mut rows: Vec<Row> = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let mut row = Row::with_capacity(columns.len());
        for (column, field) in columns.iter().zip(&fields) {
            let value = cell_value(column.get(i)?, field.effective_type());
            row.insert(field.field_name.clone(), value);
        }
        rows.push(row);
    }
    Ok(Table::new(fields, rows))
}
