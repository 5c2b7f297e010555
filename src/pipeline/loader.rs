//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use crate::error::PipelineError;
use crate::utils::{create_spinner, finish_with_success};

/// Categorical risk label used as the classification target
pub const RISK_COLUMN: &str = "Burnout_Risk";

/// Continuous score used as the regression target
pub const WELLBEING_COLUMN: &str = "Wellbeing_Index";

pub const SLEEP_COLUMN: &str = "Sleep_Quality_Score";
pub const MOTIVATION_COLUMN: &str = "Motivation_Level";

/// Nominal columns that are label-encoded before scaling
pub const CATEGORICAL_COLUMNS: [&str; 4] = [
    "Gender",
    "Country",
    "Student_Working_Status",
    "Content_Type_Preference",
];

/// Every column the pipeline reads by name
pub const REQUIRED_COLUMNS: [&str; 8] = [
    RISK_COLUMN,
    WELLBEING_COLUMN,
    "Gender",
    "Country",
    "Student_Working_Status",
    "Content_Type_Preference",
    SLEEP_COLUMN,
    MOTIVATION_COLUMN,
];

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    // 0 means "scan everything" on the CLI
    let schema_rows = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(schema_rows)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load a dataset fully into memory behind a spinner.
///
/// Returns the DataFrame together with its row count, column count and
/// estimated memory footprint in MB.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));

    let df = load_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);

    finish_with_success(&spinner, &format!("Loaded {} rows x {} columns", rows, cols));
    tracing::debug!(rows, cols, memory_mb, "dataset loaded");

    Ok((df, rows, cols, memory_mb))
}

/// Read only the schema of a dataset and return its column names
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = load_dataset(path, 100)?
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;

    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}

/// Fail if the dataset is empty or any of `columns` is absent
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), PipelineError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for col in columns {
        if !present.iter().any(|p| p == col) {
            return Err(PipelineError::missing_column(*col));
        }
    }

    if df.height() == 0 {
        return Err(PipelineError::EmptyDataset);
    }

    Ok(())
}
