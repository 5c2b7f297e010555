//! Tests for dataset loading and column checks

use std::io::Write;

use polars::prelude::*;
use tempfile::TempDir;
use wellcast::error::PipelineError;
use wellcast::pipeline::{get_column_names, load_dataset_with_progress, require_columns, REQUIRED_COLUMNS};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_file() {
    let mut df = create_genz_dataframe(40, 1);
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let (loaded, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 40);
    assert_eq!(cols, 11);
    assert!(mem_mb >= 0.0, "Memory estimate should be non-negative");
    assert_has_columns(&loaded, &REQUIRED_COLUMNS);
    assert!(require_columns(&loaded, &REQUIRED_COLUMNS).is_ok());
}

#[test]
fn test_load_parquet_file() {
    let mut df = create_genz_dataframe(25, 2);
    let (_temp_dir, parquet_path) = create_temp_parquet(&mut df);

    let (loaded, rows, cols, _mem) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(rows, 25);
    assert_eq!(cols, 11);
    assert!(loaded.equals(&df));
}

#[test]
fn test_csv_infers_numeric_and_string_columns() {
    let mut df = create_genz_dataframe(30, 3);
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let (loaded, _, _, _) = load_dataset_with_progress(&csv_path, 0).unwrap();

    assert!(loaded.column("Sleep_Quality_Score").unwrap().dtype().is_primitive_numeric());
    assert!(loaded.column("Wellbeing_Index").unwrap().dtype().is_float());
    assert_eq!(loaded.column("Gender").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_get_column_names_preserves_order() {
    let mut df = create_genz_dataframe(5, 4);
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(columns.first().map(String::as_str), Some("Age"));
    assert_eq!(columns.last().map(String::as_str), Some("Burnout_Risk"));
}

#[test]
fn test_missing_required_column_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("partial.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "Burnout_Risk,Wellbeing_Index").unwrap();
    writeln!(file, "High,3.2").unwrap();
    drop(file);

    let (df, _, _, _) = load_dataset_with_progress(&csv_path, 100).unwrap();
    let err = require_columns(&df, &REQUIRED_COLUMNS).unwrap_err();

    match err {
        PipelineError::MissingColumn { column } => assert_eq!(column, "Gender"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_extension_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, b"not a table").unwrap();

    let result = load_dataset_with_progress(&path, 100);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unsupported file format"));
}

#[test]
fn test_nonexistent_file_fails() {
    let result = load_dataset_with_progress(std::path::Path::new("/nonexistent/genz.csv"), 100);
    assert!(result.is_err());
}
