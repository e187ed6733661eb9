//! Reading and writing snapshot documents.
//!
//! A snapshot is a JSON document `{"fields": [...], "rows": [...]}`. Documents fetched
//! from the snapshot service arrive wrapped as `{"data": {...}}`, sometimes with `rows`
//! encoded as a JSON string; both shapes are accepted on load.

use crate::table::{FieldDescriptor, Table};
use crate::CompressionFormat;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Open `path` for reading, decoding it when compressed.
///
/// The compression format is `compression` when given, otherwise detected from the file
/// extension; files without a known compression extension are read as is.
pub fn open_decoded(path: &Path, compression: Option<CompressionFormat>) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let compression = compression.or_else(|| CompressionFormat::from_extension(path));
    Ok(match compression {
        Some(CompressionFormat::Gzip) => Box::new(flate2::read::GzDecoder::new(reader)),
        Some(CompressionFormat::Zstd) => Box::new(zstd::Decoder::new(reader)?),
        Some(CompressionFormat::Bzip2) => Box::new(bzip2::read::BzDecoder::new(reader)),
        Some(CompressionFormat::Xz) => Box::new(xz2::read::XzDecoder::new(reader)),
        None => Box::new(reader),
    })
}

/// Read the whole (decoded) contents of `path`.
pub fn read_decoded(path: &Path, compression: Option<CompressionFormat>) -> Result<Vec<u8>> {
    let mut reader = open_decoded(path, compression)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Load a snapshot document into a [`Table`].
pub fn load_table(path: &Path, compression: Option<CompressionFormat>) -> Result<Table> {
    let bytes = read_decoded(path, compression)?;
    let document: serde_json::Value = serde_json::from_slice(&bytes)?;
    let table = table_from_document(document)
        .wrap_err_with(|| format!("'{}' is not a snapshot document", path.display()))?;
    debug!(
        "Loaded snapshot {} with {} fields and {} rows",
        path.display(),
        table.fields.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Normalise the accepted document shapes into a table.
pub fn table_from_document(document: serde_json::Value) -> Result<Table> {
    let mut document = match document {
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(data @ serde_json::Value::Object(_)) => data,
            Some(other) => {
                map.insert("data".to_string(), other);
                serde_json::Value::Object(map)
            }
            None => serde_json::Value::Object(map),
        },
        _ => return Err(eyre!("expected a JSON object with 'fields' and 'rows'")),
    };
    if let Some(obj) = document.as_object_mut() {
        if !obj.contains_key("fields") && !obj.contains_key("rows") {
            return Err(eyre!("expected a JSON object with 'fields' and 'rows'"));
        }
        for key in ["fields", "rows"] {
            let decoded = match obj.get(key) {
                Some(serde_json::Value::String(encoded)) => Some(
                    serde_json::from_str::<serde_json::Value>(encoded)
                        .wrap_err_with(|| format!("'{}' holds a string that is not JSON", key))?,
                ),
                Some(serde_json::Value::Null) => None,
                _ => continue,
            };
            match decoded {
                Some(value) => {
                    obj.insert(key.to_string(), value);
                }
                None => {
                    obj.remove(key);
                }
            }
        }
    }
    Ok(serde_json::from_value(document)?)
}

/// Load an "enabled fields" list: a JSON array of field descriptors, optionally wrapped
/// as `{"data": [...]}` or `{"fields": [...]}`.
pub fn load_enabled_fields(path: &Path) -> Result<Vec<FieldDescriptor>> {
    let bytes = read_decoded(path, None)?;
    let document: serde_json::Value = serde_json::from_slice(&bytes)?;
    let list = match document {
        serde_json::Value::Object(mut map) => map
            .remove("data")
            .or_else(|| map.remove("fields"))
            .ok_or_else(|| eyre!("'{}' does not contain a field list", path.display()))?,
        other => other,
    };
    Ok(serde_json::from_value(list)?)
}

/// Read a JSON document of any deserializable type, decoding compression by extension.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_decoded(path, None)?;
    serde_json::from_slice(&bytes)
        .wrap_err_with(|| format!("failed to parse '{}'", path.display()))
}

/// Serialize any value as JSON text.
pub fn to_json_string<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Write a table as a snapshot document.
pub fn save_table(path: &Path, table: &Table, pretty: bool) -> Result<()> {
    write_json(path, table, pretty)?;
    debug!("Saved snapshot {} with {} rows", path.display(), table.rows.len());
    Ok(())
}

/// Write any value as JSON, creating or truncating `path`.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
