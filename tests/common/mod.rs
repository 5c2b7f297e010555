//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

use wellcast::model::TrainingConfig;
use wellcast::PipelineConfig;

const GENDERS: [&str; 3] = ["Female", "Male", "Non-binary"];
const COUNTRIES: [&str; 5] = ["Australia", "Canada", "India", "UK", "USA"];
const STATUSES: [&str; 3] = ["Both", "Student", "Working"];
const CONTENT: [&str; 5] = ["Educational", "Gaming", "Memes", "Music", "News"];

/// Create a seeded synthetic survey with the columns the pipeline expects.
///
/// `Burnout_Risk` is assigned by tercile of a stress score, so every one of
/// High/Medium/Low is present as soon as `rows >= 3`. `Wellbeing_Index` is a
/// noisy linear function of the numeric answers, clamped to 0-10.
pub fn create_genz_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut age = Vec::with_capacity(rows);
    let mut gender = Vec::with_capacity(rows);
    let mut country = Vec::with_capacity(rows);
    let mut status = Vec::with_capacity(rows);
    let mut hours = Vec::with_capacity(rows);
    let mut sleep = Vec::with_capacity(rows);
    let mut motivation = Vec::with_capacity(rows);
    let mut content = Vec::with_capacity(rows);
    let mut anxiety = Vec::with_capacity(rows);
    let mut wellbeing = Vec::with_capacity(rows);
    let mut stress = Vec::with_capacity(rows);

    for _ in 0..rows {
        let h: f64 = rng.gen_range(0.5..9.0);
        let s: i64 = rng.gen_range(1..=10);
        let m: i64 = rng.gen_range(1..=10);
        let a: i64 = rng.gen_range(1..=10);

        age.push(rng.gen_range(16i64..=28));
        gender.push(*GENDERS.choose(&mut rng).unwrap());
        country.push(*COUNTRIES.choose(&mut rng).unwrap());
        status.push(*STATUSES.choose(&mut rng).unwrap());
        content.push(*CONTENT.choose(&mut rng).unwrap());

        let w = 3.0 + 0.4 * s as f64 + 0.35 * m as f64 - 0.3 * a as f64 - 0.2 * h
            + rng.gen_range(-0.5..0.5);
        wellbeing.push((w.clamp(0.0, 10.0) * 10.0).round() / 10.0);
        stress.push(a as f64 + 0.5 * h - 0.5 * s as f64 + rng.gen_range(-1.0..1.0));

        hours.push((h * 10.0).round() / 10.0);
        sleep.push(s);
        motivation.push(m);
        anxiety.push(a);
    }

    let mut order: Vec<usize> = (0..rows).collect();
    order.sort_by(|&i, &j| stress[i].total_cmp(&stress[j]));
    let mut risk = vec![""; rows];
    for (rank, &row) in order.iter().enumerate() {
        risk[row] = match rank * 3 / rows.max(1) {
            0 => "Low",
            1 => "Medium",
            _ => "High",
        };
    }

    df! {
        "Age" => age,
        "Gender" => gender,
        "Country" => country,
        "Student_Working_Status" => status,
        "Daily_Social_Media_Hours" => hours,
        "Sleep_Quality_Score" => sleep,
        "Motivation_Level" => motivation,
        "Content_Type_Preference" => content,
        "Anxiety_Score" => anxiety,
        "Wellbeing_Index" => wellbeing,
        "Burnout_Risk" => risk,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Short, quiet training run for tests
pub fn quick_training(epochs: usize) -> TrainingConfig {
    TrainingConfig {
        epochs,
        patience: 3,
        show_progress: false,
        ..Default::default()
    }
}

/// Pipeline config reading `input` and writing everything under `out`, with plots off
pub fn quiet_pipeline_config(input: PathBuf, out: &TempDir, epochs: usize) -> PipelineConfig {
    PipelineConfig {
        input,
        eda_dir: out.path().join("eda_plots"),
        model_dir: out.path().join("model_plots"),
        training: quick_training(epochs),
        plots: false,
        ..Default::default()
    }
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}
