//! Wellcast: burnout risk and wellbeing modelling library
//!
//! Loads the Gen-Z mental wellness survey, explores it, encodes and scales the
//! features, and trains two small feed-forward networks on one shared
//! train/test split: a burnout risk classifier and a wellbeing index regressor.

pub mod cli;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod tasks;
pub mod utils;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use model::{TrainingConfig, TrainingHistory};
use pipeline::{
    analyze_dataset, load_dataset_with_progress, preprocess_data, regression_target,
    require_columns, train_test_split_indices, DataSplit, EdaReport, PreprocessConfig,
    REQUIRED_COLUMNS,
};
use report::{
    display_dataset_summary, display_preprocess_summary, export_run_report, plot_training_history,
    render_eda_plots, ClassificationReport, RegressionReport, RunMetadata, RunReport, TaskExport,
};
use tasks::{
    train_burnout_classifier, train_wellbeing_regressor, TrainedModel, CLASSIFICATION_TITLE,
    REGRESSION_TITLE,
};
use utils::{print_info, print_step_header, print_step_time, print_success, print_warning};

/// Dataset read when no input is given
pub const DEFAULT_INPUT: &str = "./public/data/genz_mental_wellness_synthetic_dataset.csv";

/// Everything one run of the pipeline needs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub eda_dir: PathBuf,
    pub model_dir: PathBuf,
    /// Test fraction, also used as validation data while training
    pub test_size: f64,
    pub preprocess: PreprocessConfig,
    pub training: TrainingConfig,
    /// Write PNG charts
    pub plots: bool,
    pub skip_eda: bool,
    pub save_models: bool,
    pub report_json: Option<PathBuf>,
    pub infer_schema_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            eda_dir: PathBuf::from("eda_plots"),
            model_dir: PathBuf::from("model_plots"),
            test_size: 0.2,
            preprocess: PreprocessConfig::default(),
            training: TrainingConfig::default(),
            plots: true,
            skip_eda: false,
            save_models: false,
            report_json: None,
            infer_schema_length: 10000,
        }
    }
}

/// Results of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub eda: Option<EdaReport>,
    pub feature_names: Vec<String>,
    pub class_names: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub classifier: TrainedModel,
    pub regressor: TrainedModel,
    pub classification: ClassificationReport,
    pub regression: RegressionReport,
    /// Every file written: charts, models and the JSON report
    pub artifacts: Vec<PathBuf>,
}

/// Run load, EDA, preprocessing, both trainings and evaluation in order.
///
/// Any failing stage aborts the run.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunOutcome> {
    let mut artifacts = Vec::new();

    // Step 1: Load
    print_step_header(1, "Loading Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) =
        load_dataset_with_progress(&config.input, config.infer_schema_length)?;
    require_columns(&df, &REQUIRED_COLUMNS)
        .with_context(|| format!("Dataset {} is missing required columns", config.input.display()))?;
    print_info(&format!("{} rows × {} columns ({:.1} MB)", rows, cols, memory_mb));
    print_step_time(step_start.elapsed());

    // Step 2: EDA
    let eda = if config.skip_eda {
        None
    } else {
        print_step_header(2, "Exploratory Analysis");
        let step_start = Instant::now();
        let eda = analyze_dataset(&df)?;
        display_dataset_summary(&eda);
        if config.plots {
            let written = render_eda_plots(&eda, &config.eda_dir)?;
            print_success(&format!(
                "Wrote {} chart(s) to {}",
                written.len(),
                config.eda_dir.display()
            ));
            artifacts.extend(written);
        }
        print_step_time(step_start.elapsed());
        Some(eda)
    };

    // Step 3: Preprocess and split
    print_step_header(3, "Preprocessing");
    let step_start = Instant::now();
    let split = train_test_split_indices(rows, config.test_size, config.training.seed)?;
    let prepared = preprocess_data(&df, &config.preprocess, config.preprocess.fit_rows(&split))?;
    display_preprocess_summary(&prepared);

    let classification_data = split.apply(&prepared.features, &prepared.label_targets())?;
    let regression_data = split.apply(&prepared.features, &regression_target(&df)?)?;
    print_info(&format!(
        "Split {} rows into {} train / {} test (seed {})",
        rows,
        split.train.len(),
        split.test.len(),
        config.training.seed
    ));
    print_step_time(step_start.elapsed());

    // Step 4: Classifier
    print_step_header(4, "Training Burnout Risk Classifier");
    let step_start = Instant::now();
    let classifier = train_burnout_classifier(&classification_data, prepared.num_classes, &config.training)?;
    report_training(&classifier, CLASSIFICATION_TITLE, config, &mut artifacts)?;

    let y_true: Vec<usize> = classification_data.y_test.iter().map(|&y| y as usize).collect();
    let y_pred = classifier.network.predict_classes(&classification_data.x_test)?;
    let classification = ClassificationReport::from_predictions(&y_true, &y_pred, prepared.class_names())?;
    classification.display("Burnout Risk Classification Report");
    print_step_time(step_start.elapsed());

    // Step 5: Regressor
    print_step_header(5, "Training Wellbeing Regressor");
    let step_start = Instant::now();
    let regressor = train_wellbeing_regressor(&regression_data, &config.training)?;
    report_training(&regressor, REGRESSION_TITLE, config, &mut artifacts)?;
    let regression = evaluate_regressor(&regressor, &regression_data)?;
    regression.display("Wellbeing Regression Report");
    print_step_time(step_start.elapsed());

    if let Some(path) = &config.report_json {
        let report = RunReport {
            metadata: RunMetadata {
                rows,
                train_rows: split.train.len(),
                test_rows: split.test.len(),
                test_size: config.test_size,
                scaler_fit: config.preprocess.scaler_fit,
                feature_names: prepared.feature_names.clone(),
                class_names: prepared.class_names().to_vec(),
                training: config.training.clone(),
                ..RunMetadata::now(&config.input)
            },
            risk_distribution: eda.as_ref().map(|e| e.risk_distribution.clone()),
            classification: task_export(&classifier, CLASSIFICATION_TITLE, classification.clone()),
            regression: task_export(&regressor, REGRESSION_TITLE, regression.clone()),
        };
        export_run_report(&report, path)?;
        print_success(&format!("Run report saved to {}", path.display()));
        artifacts.push(path.clone());
    }

    Ok(RunOutcome {
        eda,
        feature_names: prepared.feature_names,
        class_names: prepared.label_encoder.classes().to_vec(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        classifier,
        regressor,
        classification,
        regression,
        artifacts,
    })
}

fn evaluate_regressor(model: &TrainedModel, data: &DataSplit) -> Result<RegressionReport> {
    let predictions = model.network.predict_values(&data.x_test)?;
    Ok(RegressionReport::from_predictions(&data.y_test, &predictions)?)
}

/// Print the training outcome, then write learning curves and the model file if enabled
fn report_training(
    model: &TrainedModel,
    title: &str,
    config: &PipelineConfig,
    artifacts: &mut Vec<PathBuf>,
) -> Result<()> {
    let history = &model.history;
    println!("{}", model.network.summary());
    match history.stopped_epoch {
        Some(epoch) => print_info(&format!(
            "Early stopping at epoch {} (best epoch {})",
            epoch, history.best_epoch
        )),
        None => print_info(&format!("Ran all {} epochs (best epoch {})", history.len(), history.best_epoch)),
    }
    if still_improving(history) {
        print_warning(&format!(
            "{} validation loss was still improving at the epoch cap; consider raising --epochs",
            title
        ));
    }
    if let Some(last) = history.last() {
        print_info(&format!(
            "Final val_loss {:.4}, val_{} {:.4}",
            last.val_loss,
            history.metric.name(),
            last.val_metric
        ));
    }

    if config.plots {
        artifacts.extend(plot_training_history(history, title, &config.model_dir)?);
    }

    if config.save_models {
        std::fs::create_dir_all(&config.model_dir).with_context(|| {
            format!("Failed to create model directory: {}", config.model_dir.display())
        })?;
        let path = config
            .model_dir
            .join(format!("{}_model.json", title.to_lowercase()));
        model.network.save(&path)?;
        print_success(&format!("Model saved to {}", path.display()));
        artifacts.push(path);
    }

    Ok(())
}

/// True when the run hit the epoch cap with its best epoch being the last one
fn still_improving(history: &TrainingHistory) -> bool {
    history.stopped_epoch.is_none() && !history.is_empty() && history.best_epoch == history.len()
}

fn task_export<R>(model: &TrainedModel, title: &str, evaluation: R) -> TaskExport<R> {
    TaskExport {
        title: title.to_string(),
        parameters: model.network.num_parameters(),
        epochs_run: model.history.len(),
        best_epoch: model.history.best_epoch,
        evaluation,
        history: model.history.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_cli_defaults() {
        use clap::Parser;

        let from_cli = cli::Cli::parse_from(["wellcast"]).pipeline_config();
        let default = PipelineConfig::default();

        assert_eq!(from_cli.input, default.input);
        assert_eq!(from_cli.eda_dir, default.eda_dir);
        assert_eq!(from_cli.model_dir, default.model_dir);
        assert_eq!(from_cli.test_size, default.test_size);
        assert_eq!(from_cli.training.epochs, default.training.epochs);
        assert_eq!(from_cli.training.batch_size, default.training.batch_size);
        assert_eq!(from_cli.training.learning_rate, default.training.learning_rate);
        assert_eq!(from_cli.training.patience, default.training.patience);
        assert_eq!(from_cli.training.seed, default.training.seed);
        assert_eq!(from_cli.preprocess.scaler_fit, default.preprocess.scaler_fit);
        assert_eq!(from_cli.plots, default.plots);
        assert_eq!(from_cli.infer_schema_length, default.infer_schema_length);
    }

    #[test]
    fn test_still_improving_only_when_best_epoch_is_the_cap() {
        use crate::model::{EpochLog, Metric};

        let mut history = TrainingHistory::new(Metric::MeanAbsoluteError);
        assert!(!still_improving(&history));

        for epoch in 1..=3 {
            history.epochs.push(EpochLog {
                epoch,
                loss: 1.0 / epoch as f64,
                metric: 0.0,
                val_loss: 1.0 / epoch as f64,
                val_metric: 0.0,
            });
        }
        history.best_epoch = 3;
        assert!(still_improving(&history));

        history.best_epoch = 2;
        assert!(!still_improving(&history));

        history.best_epoch = 3;
        history.stopped_epoch = Some(3);
        assert!(!still_improving(&history));
    }
}
