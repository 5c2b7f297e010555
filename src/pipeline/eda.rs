//! Exploratory data analysis: the numbers behind the EDA charts

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::correlation::{correlation_matrix, numeric_column_names, CorrelationMatrix};
use super::encoding::column_to_string_vec;
use super::loader::{require_columns, MOTIVATION_COLUMN, RISK_COLUMN, SLEEP_COLUMN};
use super::preprocess::column_as_f64;

/// Number of rows per risk category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Scatter points of one risk category
#[derive(Debug, Clone, Serialize)]
pub struct ScatterGroup {
    pub category: String,
    pub points: Vec<(f64, f64)>,
}

/// Descriptive statistics of one numeric column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Everything the EDA step reports and plots
#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub rows: usize,
    pub columns: usize,
    pub risk_distribution: Vec<CategoryCount>,
    pub correlation: CorrelationMatrix,
    pub sleep_vs_motivation: Vec<ScatterGroup>,
    pub numeric_summary: Vec<ColumnStats>,
}

/// Run every EDA computation on the raw table
pub fn analyze_dataset(df: &DataFrame) -> Result<EdaReport> {
    require_columns(df, &[RISK_COLUMN, SLEEP_COLUMN, MOTIVATION_COLUMN])?;

    Ok(EdaReport {
        rows: df.height(),
        columns: df.width(),
        risk_distribution: risk_distribution(df)?,
        correlation: correlation_matrix(df)?,
        sleep_vs_motivation: sleep_vs_motivation(df)?,
        numeric_summary: summarize_dataset(df)?,
    })
}

/// Count rows per `Burnout_Risk` value, in order of first appearance
pub fn risk_distribution(df: &DataFrame) -> Result<Vec<CategoryCount>> {
    let labels = risk_labels(df)?;
    let mut counts: Vec<CategoryCount> = Vec::new();

    for label in labels {
        match counts.iter_mut().find(|c| c.category == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: label,
                count: 1,
            }),
        }
    }

    Ok(counts)
}

/// Sleep quality against motivation, grouped by risk category
pub fn sleep_vs_motivation(df: &DataFrame) -> Result<Vec<ScatterGroup>> {
    require_columns(df, &[RISK_COLUMN, SLEEP_COLUMN, MOTIVATION_COLUMN])?;

    let labels = risk_labels(df)?;
    let sleep = column_as_f64(df.column(SLEEP_COLUMN)?)?;
    let motivation = column_as_f64(df.column(MOTIVATION_COLUMN)?)?;

    let mut groups: Vec<ScatterGroup> = Vec::new();
    for ((label, x), y) in labels.into_iter().zip(sleep).zip(motivation) {
        match groups.iter_mut().find(|g| g.category == label) {
            Some(group) => group.points.push((x, y)),
            None => groups.push(ScatterGroup {
                category: label,
                points: vec![(x, y)],
            }),
        }
    }

    Ok(groups)
}

/// Mean, population std, min and max of every numeric column (nulls skipped)
pub fn summarize_dataset(df: &DataFrame) -> Result<Vec<ColumnStats>> {
    let mut stats = Vec::new();

    for name in numeric_column_names(df) {
        let cast = df.column(&name)?.cast(&DataType::Float64)?;
        let values: Vec<f64> = cast.f64()?.into_iter().flatten().collect();
        if values.is_empty() {
            continue;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        stats.push(ColumnStats {
            name,
            mean,
            std: var.sqrt(),
            min,
            max,
        });
    }

    Ok(stats)
}

fn risk_labels(df: &DataFrame) -> Result<Vec<String>> {
    require_columns(df, &[RISK_COLUMN])?;
    let values = column_to_string_vec(df.column(RISK_COLUMN)?)?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| "null".to_string()))
        .collect())
}
