use flate2::write::GzEncoder;
use flate2::Compression;
use snaplens::snapshot::{load_enabled_fields, load_table, save_table};
use snaplens::{CompressionFormat, DataType, Value};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

mod common;

#[test]
fn test_save_and_load_snapshot() {
    let dir = TempDir::new().unwrap();
    let table = common::sales_table();
    let path = common::write_snapshot(dir.path(), "sales.json", &table);

    let loaded = load_table(&path, None).unwrap();
    assert_eq!(loaded, table);
    // Field order within each row survives the round trip
    let keys: Vec<&String> = loaded.rows[0].keys().collect();
    assert_eq!(keys, vec!["region", "amount", "day", "paid"]);
}

#[test]
fn test_load_gzip_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.json.gz");
    let table = common::amounts_table();

    let file = File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(serde_json::to_string(&table).unwrap().as_bytes())
        .unwrap();
    encoder.finish().unwrap();

    assert_eq!(load_table(&path, None).unwrap(), table);

    // Explicit compression works regardless of the extension
    let renamed = dir.path().join("sales.bin");
    std::fs::rename(&path, &renamed).unwrap();
    assert_eq!(
        load_table(&renamed, Some(CompressionFormat::Gzip)).unwrap(),
        table
    );
}

#[test]
fn test_load_service_wrapped_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(
        dir.path(),
        "wrapped.json",
        r#"{"data": {"fields": [{"field_id": "n", "field_name": "n", "data_type": "number"}],
                     "rows": "[{\"n\": 1}, {\"n\": 2}]"}}"#,
    );
    let table = load_table(&path, None).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1]["n"], Value::from(2.0));
}

#[test]
fn test_enabled_fields_fill_missing_types() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(
        dir.path(),
        "untyped.json",
        r#"{"fields": [{"field_id": "a", "field_name": "a"}, {"field_id": "b", "field_name": "b"}],
            "rows": [{"a": 1, "b": "x"}]}"#,
    );
    let fields_path = common::write_file(
        dir.path(),
        "fields.json",
        r#"{"data": [{"field_id": "a", "field_name": "a", "data_type": "number"}]}"#,
    );

    let table = load_table(&path, None).unwrap();
    let enabled = load_enabled_fields(&fields_path).unwrap();
    let typed = table.with_enabled_field_types(&enabled);
    assert_eq!(typed.fields[0].data_type, Some(DataType::Number));
    assert_eq!(typed.fields[1].data_type, Some(DataType::Text));
}

#[test]
fn test_save_pretty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pretty.json");
    save_table(&path, &common::amounts_table(), true).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"fields\""));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_table(&dir.path().join("absent.json"), None).unwrap_err();
    let io = err.downcast_ref::<std::io::Error>().expect("io error");
    assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
}
