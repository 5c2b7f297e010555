//! Standardization of feature columns

use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::error::PipelineError;

/// Columns whose deviation falls below this are left unscaled
const MIN_STD: f64 = 1e-12;

/// Per-column mean and population standard deviation.
///
/// `transform` computes `(x - mean) / std`. A constant column has its
/// deviation replaced by 1 so it maps to all zeros instead of NaN.
#[derive(Debug, Clone, Serialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl StandardScaler {
    /// Fit on every row of `data`
    pub fn fit(data: &Array2<f64>) -> Result<Self, PipelineError> {
        if data.nrows() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or(PipelineError::EmptyDataset)?;
        let std = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_STD { 1.0 } else { s });

        Ok(Self { mean, std })
    }

    /// Fit on the given subset of rows only
    pub fn fit_rows(data: &Array2<f64>, rows: &[usize]) -> Result<Self, PipelineError> {
        Self::fit(&data.select(Axis(0), rows))
    }

    pub fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        if data.ncols() != self.mean.len() {
            return Err(PipelineError::ShapeMismatch {
                context: "StandardScaler::transform".to_string(),
                expected: self.mean.len(),
                actual: data.ncols(),
            });
        }

        Ok((data - &self.mean) / &self.std)
    }

    pub fn fit_transform(data: &Array2<f64>) -> Result<(Self, Array2<f64>), PipelineError> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }
}
