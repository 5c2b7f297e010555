//! Error types for the wellcast pipeline.
//!
//! Library functions return `PipelineError` for failures that callers may want
//! to match on. The binary wraps them in `anyhow` with additional context.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the loading, preprocessing, training and plotting stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A column the pipeline depends on is not present in the dataset.
    #[error("Required column '{column}' not found in dataset")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// The dataset has no rows.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A column used for modelling contains null values.
    #[error("Column '{column}' contains {count} missing value(s)")]
    MissingValues {
        /// Column name
        column: String,
        /// Number of null entries
        count: usize,
    },

    /// A feature column is neither numeric nor one of the encoded nominal columns.
    #[error("Column '{column}' has non-numeric type {dtype} and is not an encoded categorical column")]
    NonNumericFeature {
        /// Column name
        column: String,
        /// Polars data type, rendered
        dtype: String,
    },

    /// A value was not seen when the encoder for this column was fitted.
    #[error("Value '{value}' in column '{column}' was not seen when fitting its encoder")]
    UnseenCategory {
        /// Column name
        column: String,
        /// Offending value
        value: String,
    },

    /// Test fraction outside the open interval (0, 1).
    #[error("Test size must be between 0 and 1 (exclusive), got {0}")]
    InvalidTestSize(f64),

    /// The split would leave one of the partitions without rows.
    #[error("Split of {rows} row(s) leaves an empty partition ({train} train / {test} test)")]
    EmptyPartition {
        /// Total number of rows
        rows: usize,
        /// Rows assigned to training
        train: usize,
        /// Rows assigned to testing
        test: usize,
    },

    /// Array dimensions do not line up.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Where the mismatch was detected
        context: String,
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// A classification target is not an integer in `0..num_classes`.
    #[error("Class id {value} is not an integer in 0..{num_classes}")]
    InvalidClassId {
        /// Offending target value
        value: f64,
        /// Width of the output layer
        num_classes: usize,
    },

    /// Training produced a NaN or infinite loss.
    #[error("{model} loss became non-finite at epoch {epoch}")]
    NonFiniteLoss {
        /// Model being trained
        model: String,
        /// One-based epoch number
        epoch: usize,
    },

    /// A chart could not be drawn or written.
    #[error("Failed to render {}: {message}", .path.display())]
    Plot {
        /// Target image path
        path: PathBuf,
        /// Backend error, rendered
        message: String,
    },
}

impl PipelineError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = PipelineError::missing_column("Burnout_Risk");
        assert_eq!(
            err.to_string(),
            "Required column 'Burnout_Risk' not found in dataset"
        );
    }

    #[test]
    fn test_plot_error_includes_path() {
        let err = PipelineError::Plot {
            path: PathBuf::from("eda_plots/x.png"),
            message: "font unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("eda_plots/x.png"));
        assert!(msg.contains("font unavailable"));
    }
}
