//! Feature preparation: categorical encoding, label encoding and scaling

use anyhow::{Context, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::Serialize;

use super::encoding::LabelEncoder;
use super::loader::{CATEGORICAL_COLUMNS, RISK_COLUMN, WELLBEING_COLUMN};
use super::scaling::StandardScaler;
use super::split::SplitIndices;
use crate::error::PipelineError;

/// Which rows the feature scaler is fitted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum ScalerFit {
    /// Fit on every row before splitting
    #[default]
    #[value(name = "full")]
    #[serde(rename = "full")]
    FullDataset,
    /// Fit on the training partition only and apply to both partitions
    #[value(name = "train")]
    #[serde(rename = "train")]
    TrainingPartition,
}

/// Options for `preprocess_data`
#[derive(Debug, Clone, Default)]
pub struct PreprocessConfig {
    /// Extra columns excluded from the feature matrix
    pub drop_columns: Vec<String>,
    pub scaler_fit: ScalerFit,
}

impl PreprocessConfig {
    /// Rows the scaler should be fitted on, `None` meaning all of them
    pub fn fit_rows<'a>(&self, split: &'a SplitIndices) -> Option<&'a [usize]> {
        match self.scaler_fit {
            ScalerFit::FullDataset => None,
            ScalerFit::TrainingPartition => Some(&split.train),
        }
    }
}

/// Model-ready arrays produced from the raw table
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Standardized features, one row per record
    pub features: Array2<f64>,
    pub feature_names: Vec<String>,
    /// Encoded `Burnout_Risk` per record
    pub labels: Vec<usize>,
    pub num_classes: usize,
    pub label_encoder: LabelEncoder,
    /// One independent encoder per nominal feature column
    pub feature_encoders: Vec<LabelEncoder>,
}

impl PreparedData {
    pub fn class_names(&self) -> &[String] {
        self.label_encoder.classes()
    }

    /// Class ids as floats, the target representation the network trains on
    pub fn label_targets(&self) -> Array1<f64> {
        self.labels.iter().map(|&c| c as f64).collect()
    }
}

/// Encode and scale the feature set and encode the risk label.
///
/// Nominal columns are label-encoded, every column except the risk label and
/// `config.drop_columns` becomes a feature, and all features are standardized.
/// With `fit_rows` the scaler statistics come from those rows only.
pub fn preprocess_data(
    df: &DataFrame,
    config: &PreprocessConfig,
    fit_rows: Option<&[usize]>,
) -> Result<PreparedData> {
    let risk = df
        .column(RISK_COLUMN)
        .map_err(|_| PipelineError::missing_column(RISK_COLUMN))?;
    let (label_encoder, labels) = LabelEncoder::fit_transform(risk)
        .with_context(|| format!("Failed to encode target column '{}'", RISK_COLUMN))?;
    let num_classes = label_encoder.num_classes();

    let (raw, feature_names, feature_encoders) = encode_features(df, config)?;

    let scaler = match fit_rows {
        Some(rows) => StandardScaler::fit_rows(&raw, rows)?,
        None => StandardScaler::fit(&raw)?,
    };
    let features = scaler.transform(&raw)?;

    tracing::debug!(
        features = feature_names.len(),
        num_classes,
        classes = ?label_encoder.classes(),
        "preprocessing complete"
    );

    Ok(PreparedData {
        features,
        feature_names,
        labels,
        num_classes,
        label_encoder,
        feature_encoders,
    })
}

/// Build the unscaled feature matrix.
///
/// Returns the matrix, the feature names in dataset order and the encoders
/// fitted for the nominal columns.
pub fn encode_features(
    df: &DataFrame,
    config: &PreprocessConfig,
) -> Result<(Array2<f64>, Vec<String>, Vec<LabelEncoder>)> {
    for name in CATEGORICAL_COLUMNS {
        if df.column(name).is_err() {
            return Err(PipelineError::missing_column(name).into());
        }
    }

    let n_rows = df.height();
    if n_rows == 0 {
        return Err(PipelineError::EmptyDataset.into());
    }

    let mut names = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut encoders = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        if name == RISK_COLUMN || config.drop_columns.contains(&name) {
            continue;
        }

        let values = if CATEGORICAL_COLUMNS.contains(&name.as_str()) {
            let (encoder, codes) = LabelEncoder::fit_transform(col)
                .with_context(|| format!("Failed to encode column '{}'", name))?;
            encoders.push(encoder);
            codes.into_iter().map(|c| c as f64).collect()
        } else if col.dtype().is_primitive_numeric() {
            column_as_f64(col)?
        } else {
            return Err(PipelineError::NonNumericFeature {
                column: name,
                dtype: col.dtype().to_string(),
            }
            .into());
        };

        names.push(name);
        columns.push(values);
    }

    let matrix = Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| columns[j][i]);
    Ok((matrix, names, encoders))
}

/// `Wellbeing_Index` from the raw table
pub fn regression_target(df: &DataFrame) -> Result<Array1<f64>> {
    let col = df
        .column(WELLBEING_COLUMN)
        .map_err(|_| PipelineError::missing_column(WELLBEING_COLUMN))?;
    Ok(Array1::from(column_as_f64(col)?))
}

/// Cast a numeric column to f64, rejecting nulls
pub(crate) fn column_as_f64(col: &Column) -> Result<Vec<f64>> {
    let nulls = col.null_count();
    if nulls > 0 {
        return Err(PipelineError::MissingValues {
            column: col.name().to_string(),
            count: nulls,
        }
        .into());
    }

    let cast = col.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_no_null_iter().collect())
}
