//! Tests for encoding, scaling and the shared train/test split

use approx::assert_abs_diff_eq;
use ndarray::Axis;
use polars::prelude::*;
use std::collections::HashSet;
use wellcast::error::PipelineError;
use wellcast::pipeline::{
    preprocess_data, regression_target, train_test_split_indices, PreprocessConfig, ScalerFit,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_standardized_features_have_zero_mean_unit_std() {
    let df = create_genz_dataframe(300, 21);
    let prepared = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap();

    let means = prepared.features.mean_axis(Axis(0)).unwrap();
    let stds = prepared.features.std_axis(Axis(0), 0.0);
    for (j, name) in prepared.feature_names.iter().enumerate() {
        assert_abs_diff_eq!(means[j], 0.0, epsilon = 1e-9);
        assert!((stds[j] - 1.0).abs() < 1e-9, "{} has std {}", name, stds[j]);
    }
}

#[test]
fn test_feature_set_is_every_column_but_the_label() {
    let df = create_genz_dataframe(50, 22);
    let prepared = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap();

    assert_eq!(prepared.feature_names.len(), 10);
    assert!(!prepared.feature_names.iter().any(|n| n == "Burnout_Risk"));
    // Kept by default as part of the feature set
    assert!(prepared.feature_names.iter().any(|n| n == "Wellbeing_Index"));

    let config = PreprocessConfig {
        drop_columns: vec!["Wellbeing_Index".to_string()],
        ..Default::default()
    };
    let prepared = preprocess_data(&df, &config, None).unwrap();
    assert_eq!(prepared.features.ncols(), 9);
    assert!(!prepared.feature_names.iter().any(|n| n == "Wellbeing_Index"));
}

#[test]
fn test_label_codes_follow_sorted_class_names() {
    let df = create_genz_dataframe(60, 23);
    let prepared = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap();

    assert_eq!(prepared.num_classes, 3);
    assert_eq!(prepared.class_names(), &["High", "Low", "Medium"]);

    let raw = df.column("Burnout_Risk").unwrap().str().unwrap().clone();
    for (value, &code) in raw.into_no_null_iter().zip(&prepared.labels) {
        assert_eq!(prepared.class_names()[code], value);
    }
}

#[test]
fn test_each_encoder_is_a_bijection_over_its_column() {
    let df = create_genz_dataframe(200, 24);
    let prepared = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap();

    assert_eq!(prepared.feature_encoders.len(), 4);
    for encoder in &prepared.feature_encoders {
        let distinct: HashSet<String> = df
            .column(encoder.column())
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .map(String::from)
            .collect();

        assert_eq!(encoder.num_classes(), distinct.len());
        for value in &distinct {
            let code = encoder.encode(value).unwrap();
            assert!(code < encoder.num_classes());
            assert_eq!(encoder.decode(code), Some(value.as_str()));
        }
    }
}

#[test]
fn test_train_scaler_fit_centers_training_rows() {
    let df = create_genz_dataframe(150, 25);
    let split = train_test_split_indices(df.height(), 0.2, 42).unwrap();
    let config = PreprocessConfig {
        scaler_fit: ScalerFit::TrainingPartition,
        ..Default::default()
    };

    let prepared = preprocess_data(&df, &config, config.fit_rows(&split)).unwrap();
    let train_means = prepared
        .features
        .select(Axis(0), &split.train)
        .mean_axis(Axis(0))
        .unwrap();

    for m in train_means.iter() {
        assert_abs_diff_eq!(*m, 0.0, epsilon = 1e-9);
    }
    assert!(PreprocessConfig::default().fit_rows(&split).is_none());
}

#[test]
fn test_split_is_shared_by_both_tasks() {
    let df = create_genz_dataframe(100, 26);
    let prepared = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap();
    let split = train_test_split_indices(df.height(), 0.2, 42).unwrap();

    let classification = split.apply(&prepared.features, &prepared.label_targets()).unwrap();
    let regression = split.apply(&prepared.features, &regression_target(&df).unwrap()).unwrap();

    assert_eq!(classification.x_train, regression.x_train);
    assert_eq!(classification.x_test, regression.x_test);
    assert_eq!(classification.x_test.nrows(), 20);
    assert_eq!(regression.y_train.len(), 80);

    let again = train_test_split_indices(df.height(), 0.2, 42).unwrap();
    assert_eq!(split, again);
}

#[test]
fn test_missing_values_are_rejected() {
    let mut df = create_genz_dataframe(10, 27);
    let sleep: Vec<Option<i64>> = (0..10).map(|i| if i == 3 { None } else { Some(5) }).collect();
    df.with_column(Column::new("Sleep_Quality_Score".into(), sleep)).unwrap();

    let err = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MissingValues { column, count }) => {
            assert_eq!(column, "Sleep_Quality_Score");
            assert_eq!(*count, 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unexpected_text_column_is_rejected() {
    let mut df = create_genz_dataframe(10, 28);
    df.with_column(Column::new("Platform".into(), vec!["TikTok"; 10])).unwrap();

    let err = preprocess_data(&df, &PreprocessConfig::default(), None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NonNumericFeature { .. })
    ));
}
