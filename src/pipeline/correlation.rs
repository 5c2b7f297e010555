//! Pearson correlation matrix over the numeric columns of a dataset

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// Square correlation matrix with its column labels
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major `columns.len() x columns.len()` values
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Names of all primitive numeric columns, in dataset order
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

/// Compute the Pearson correlation matrix of every numeric column.
///
/// Algorithm:
/// 1. Standardize each column: z = (x - mean) / (std * sqrt(n))
/// 2. Compute R = Z^T * Z
/// 3. Recompute every pair touching a null-bearing column over the rows where
///    both values are present
///
/// A pair with zero variance over its shared rows is NaN, diagonal included.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let names = numeric_column_names(df);
    let n_rows = df.height();
    let n_cols = names.len();

    if n_cols == 0 || n_rows == 0 {
        return Ok(CorrelationMatrix {
            columns: names,
            values: vec![vec![f64::NAN; n_cols]; n_cols],
        });
    }

    // Pre-cast all numeric columns to Float64
    let float_columns: Vec<Column> = names
        .iter()
        .map(|name| Ok(df.column(name)?.cast(&DataType::Float64)?))
        .collect::<PolarsResult<_>>()?;
    let has_nulls: Vec<bool> = float_columns.iter().map(|col| col.null_count() > 0).collect();

    let standardized: Vec<Option<Vec<f64>>> = float_columns
        .par_iter()
        .map(|col| standardize(col.f64().ok()?))
        .collect();

    // Build the standardized data matrix Z (n_rows x n_cols)
    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, values) in standardized.iter().enumerate() {
        if let Some(values) = values {
            for (row_idx, &val) in values.iter().enumerate() {
                z[(row_idx, col_idx)] = val;
            }
        }
    }

    let corr = z.transpose() * &z;

    let mut values: Vec<Vec<f64>> = (0..n_cols)
        .map(|i| {
            (0..n_cols)
                .map(|j| {
                    if standardized[i].is_none() || standardized[j].is_none() {
                        f64::NAN
                    } else {
                        corr[(i, j)].clamp(-1.0, 1.0)
                    }
                })
                .collect()
        })
        .collect();

    if has_nulls.iter().any(|&n| n) {
        let raw: Vec<Vec<Option<f64>>> = float_columns
            .iter()
            .map(|col| Ok(col.f64()?.into_iter().collect()))
            .collect::<PolarsResult<_>>()?;

        let pairs: Vec<(usize, usize)> = (0..n_cols)
            .flat_map(|i| (i..n_cols).map(move |j| (i, j)))
            .filter(|&(i, j)| has_nulls[i] || has_nulls[j])
            .collect();

        let pairwise: Vec<(usize, usize, f64)> = pairs
            .into_par_iter()
            .map(|(i, j)| (i, j, pairwise_pearson(&raw[i], &raw[j])))
            .collect();

        for (i, j, r) in pairwise {
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: names,
        values,
    })
}

/// Pearson correlation over the rows where both columns have a value
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.is_empty() {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        f64::NAN
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    }
}

/// Scale a column so that the dot product of two scaled columns is their correlation
fn standardize(ca: &Float64Chunked) -> Option<Vec<f64>> {
    let valid: Vec<f64> = ca.into_iter().flatten().collect();
    let n = valid.len();
    if n == 0 {
        return None;
    }

    let mean = valid.iter().sum::<f64>() / n as f64;
    let var = valid.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let std = var.sqrt();
    if std == 0.0 {
        return None;
    }

    let scale = std * (n as f64).sqrt();
    Some(
        ca.into_iter()
            .map(|v| v.map_or(0.0, |x| (x - mean) / scale))
            .collect(),
    )
}
