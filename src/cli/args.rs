//! Command-line argument definitions using clap

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::model::TrainingConfig;
use crate::pipeline::{PreprocessConfig, ScalerFit};
use crate::PipelineConfig;

/// Wellcast - Train burnout risk and wellbeing models on Gen-Z wellness survey data
#[derive(Parser, Debug)]
#[command(name = "wellcast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long, default_value = crate::DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory for the exploratory charts
    #[arg(long, default_value = "eda_plots")]
    pub eda_dir: PathBuf,

    /// Directory for learning curves and saved models
    #[arg(long, default_value = "model_plots")]
    pub model_dir: PathBuf,

    /// Seed for the train/test split, weight initialization, shuffling and dropout
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for testing (and used as validation data)
    #[arg(long, default_value = "0.2", value_parser = validate_test_size)]
    pub test_size: f64,

    /// Maximum number of training epochs per model
    #[arg(long, default_value = "100", value_parser = validate_positive)]
    pub epochs: usize,

    /// Mini-batch size
    #[arg(long, default_value = "32", value_parser = validate_positive)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value = "0.001", value_parser = validate_learning_rate)]
    pub learning_rate: f64,

    /// Epochs without validation loss improvement before training stops
    #[arg(long, default_value = "10")]
    pub patience: usize,

    /// Minimum decrease in validation loss that counts as an improvement
    #[arg(long, default_value = "0.0")]
    pub min_delta: f64,

    /// Roll back to the weights of the best validation epoch after training
    #[arg(long, default_value = "false")]
    pub restore_best_weights: bool,

    /// Rows the feature scaler is fitted on.
    /// "full" fits on the whole dataset before splitting, "train" on the training partition only.
    #[arg(long, value_enum, default_value = "full")]
    pub scaler_fit: ScalerFit,

    /// Columns excluded from the feature set (comma-separated).
    /// Example: --drop-columns Wellbeing_Index
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Do not write any PNG charts
    #[arg(long, default_value = "false")]
    pub no_plots: bool,

    /// Skip the exploratory analysis step
    #[arg(long, default_value = "false")]
    pub skip_eda: bool,

    /// Save both trained networks as JSON into the model directory
    #[arg(long, default_value = "false")]
    pub save_models: bool,

    /// Write metrics, histories and run metadata to this JSON file
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Translate the parsed flags into a pipeline configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input: self.input.clone(),
            eda_dir: self.eda_dir.clone(),
            model_dir: self.model_dir.clone(),
            test_size: self.test_size,
            preprocess: PreprocessConfig {
                drop_columns: self.drop_columns.clone(),
                scaler_fit: self.scaler_fit,
            },
            training: TrainingConfig {
                epochs: self.epochs,
                batch_size: self.batch_size,
                learning_rate: self.learning_rate,
                patience: self.patience,
                min_delta: self.min_delta,
                restore_best_weights: self.restore_best_weights,
                seed: self.seed,
                show_progress: true,
            },
            plots: !self.no_plots,
            skip_eda: self.skip_eda,
            save_models: self.save_models,
            report_json: self.report_json.clone(),
            infer_schema_length: self.infer_schema_length,
        }
    }

    /// Default `tracing` directive for the crate, overridden by `RUST_LOG`
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "wellcast=warn",
            1 => "wellcast=info",
            _ => "wellcast=debug",
        }
    }
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}

/// Validator for learning_rate parameter
fn validate_learning_rate(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("learning_rate must be positive, got {}", value))
    }
}

fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid positive integer", s))?;

    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
