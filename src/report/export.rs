//! JSON export of a complete pipeline run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::evaluation::{ClassificationReport, RegressionReport};
use crate::model::{TrainingConfig, TrainingHistory};
use crate::pipeline::{CategoryCount, ScalerFit};

/// Metadata about the run
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub wellcast_version: String,
    pub input_file: String,
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_size: f64,
    pub scaler_fit: ScalerFit,
    pub feature_names: Vec<String>,
    pub class_names: Vec<String>,
    pub training: TrainingConfig,
}

/// One trained model's results
#[derive(Debug, Clone, Serialize)]
pub struct TaskExport<R> {
    pub title: String,
    pub parameters: usize,
    pub epochs_run: usize,
    pub best_epoch: usize,
    pub evaluation: R,
    pub history: TrainingHistory,
}

/// Everything written by `--report-json`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_distribution: Option<Vec<CategoryCount>>,
    pub classification: TaskExport<ClassificationReport>,
    pub regression: TaskExport<RegressionReport>,
}

impl RunMetadata {
    /// Metadata stamped with the current time and crate version
    pub fn now(input_file: &Path) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            wellcast_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            rows: 0,
            train_rows: 0,
            test_rows: 0,
            test_size: 0.0,
            scaler_fit: ScalerFit::default(),
            feature_names: Vec::new(),
            class_names: Vec::new(),
            training: TrainingConfig::default(),
        }
    }
}

/// Write `report` as pretty-printed JSON, creating parent directories
pub fn export_run_report(report: &RunReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EpochLog, Metric};
    use ndarray::array;
    use tempfile::TempDir;

    fn sample_report() -> RunReport {
        let names: Vec<String> = vec!["High".into(), "Low".into()];
        let mut history = TrainingHistory::new(Metric::Accuracy);
        history.epochs.push(EpochLog {
            epoch: 1,
            loss: 0.7,
            metric: 0.5,
            val_loss: 0.69,
            val_metric: 0.5,
        });
        history.best_epoch = 1;

        RunReport {
            metadata: RunMetadata::now(Path::new("data.csv")),
            risk_distribution: None,
            classification: TaskExport {
                title: "Burnout_Classification".to_string(),
                parameters: 10,
                epochs_run: 1,
                best_epoch: 1,
                evaluation: ClassificationReport::from_predictions(&[0, 1], &[0, 1], &names).unwrap(),
                history: history.clone(),
            },
            regression: TaskExport {
                title: "Wellbeing_Regression".to_string(),
                parameters: 10,
                epochs_run: 1,
                best_epoch: 1,
                evaluation: RegressionReport::from_predictions(&array![1.0, 2.0], &array![1.0, 2.5]).unwrap(),
                history: TrainingHistory {
                    metric: Metric::MeanAbsoluteError,
                    ..history
                },
            },
        }
    }

    #[test]
    fn test_export_writes_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("run.json");

        export_run_report(&sample_report(), &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["metadata"]["input_file"], "data.csv");
        assert_eq!(value["metadata"]["scaler_fit"], "full");
        assert_eq!(value["classification"]["evaluation"]["accuracy"], 1.0);
        assert_eq!(value["regression"]["history"]["metric"], "MeanAbsoluteError");
        assert!(value.get("risk_distribution").is_none());
        assert!(value["metadata"]["training"].get("show_progress").is_none());
    }
}
