#![allow(dead_code)]

use serde_json::json;
use snaplens::snapshot::save_table;
use snaplens::Table;
use std::path::{Path, PathBuf};

/// Small sales snapshot: text, number, date and boolean fields, one row with gaps.
pub fn sales_table() -> Table {
    serde_json::from_value(json!({
        "fields": [
            {"field_id": "f_region", "field_name": "region", "data_type": "text"},
            {"field_id": "f_amount", "field_name": "amount", "data_type": "number"},
            {"field_id": "f_day", "field_name": "day", "data_type": "date"},
            {"field_id": "f_paid", "field_name": "paid", "data_type": "boolean"}
        ],
        "rows": [
            {"region": "north", "amount": 12, "day": "2023-12-31 10:00", "paid": true},
            {"region": "south", "amount": 5, "day": "2024-01-02", "paid": false},
            {"region": "north", "amount": 30.5, "day": "2024-01-15", "paid": true},
            {"region": null, "amount": "n/a", "day": null},
            {"region": "east", "amount": 8, "day": "2024/02/01", "paid": false}
        ]
    }))
    .expect("sales fixture is a valid table")
}

/// Three-row table used for the filter-then-aggregate scenario.
pub fn amounts_table() -> Table {
    serde_json::from_value(json!({
        "fields": [
            {"field_id": "id", "field_name": "id", "data_type": "text"},
            {"field_id": "amount", "field_name": "amount", "data_type": "number"}
        ],
        "rows": [
            {"id": "a", "amount": 4},
            {"id": "b", "amount": 15},
            {"id": "c", "amount": 22.5}
        ]
    }))
    .expect("amounts fixture is a valid table")
}

/// Write `table` as a snapshot document under `dir`.
pub fn write_snapshot(dir: &Path, name: &str, table: &Table) -> PathBuf {
    let path = dir.join(name);
    save_table(&path, table, false).expect("Failed to write snapshot");
    path
}

/// Write raw text to a file under `dir`.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write file");
    path
}
