//! Label encoding of categorical columns
//!
//! Each encoder owns the code space of exactly one column: its classes are the
//! column's distinct values in sorted order and a value's code is its index.
//! Encoders are never shared between columns.

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::error::PipelineError;

/// Fitted mapping from a column's distinct values to `0..num_classes`
#[derive(Debug, Clone, Serialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder on the distinct values of `col`.
    ///
    /// Numeric columns are ordered numerically, everything else lexically.
    /// Null values are rejected.
    pub fn fit(col: &Column) -> Result<Self> {
        let name = col.name().to_string();
        let values = column_to_string_vec(col)?;
        let nulls = values.iter().filter(|v| v.is_none()).count();
        if nulls > 0 {
            return Err(PipelineError::MissingValues {
                column: name,
                count: nulls,
            }
            .into());
        }

        let mut classes: Vec<String> = values.into_iter().flatten().collect();
        if col.dtype().is_primitive_numeric() {
            classes.sort_by(|a, b| {
                let a: f64 = a.parse().unwrap_or(f64::NAN);
                let b: f64 = b.parse().unwrap_or(f64::NAN);
                a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
            });
        } else {
            classes.sort();
        }
        classes.dedup();

        Ok(Self {
            column: name,
            classes,
        })
    }

    /// Map every value of `col` to its code
    pub fn transform(&self, col: &Column) -> Result<Vec<usize>> {
        let values = column_to_string_vec(col)?;
        let mut codes = Vec::with_capacity(values.len());

        for value in values {
            let value = value.ok_or_else(|| PipelineError::MissingValues {
                column: self.column.clone(),
                count: col.null_count(),
            })?;
            codes.push(self.encode(&value)?);
        }

        Ok(codes)
    }

    /// Fit on `col` and return the encoder together with the encoded column
    pub fn fit_transform(col: &Column) -> Result<(Self, Vec<usize>)> {
        let encoder = Self::fit(col)?;
        let codes = encoder.transform(col)?;
        Ok((encoder, codes))
    }

    /// Code of a single value
    pub fn encode(&self, value: &str) -> Result<usize, PipelineError> {
        self.classes
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| PipelineError::UnseenCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Value for a code, if the code is in range
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }
}

/// Convert a column to a Vec of Option<String> for comparison
pub(crate) fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            // Categoricals, dates and friends go through their string form
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
