//! End-to-end training and prediction runs against temporary directories.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use models::Regressor;
use pipeline::{PipelineConfig, PipelineError, prepare_features, run_prediction, run_training};
use storage::{ModelArtifact, StorageError, load_artifact, save_artifact};
use types::DataError;

fn write_dataset(path: &Path, days: i64) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut csv = String::from("data,venda,estoque,preco,loja\n");
    for i in 0..days {
        let date = start + Duration::days(i);
        let sales = 40 + (i % 7) * 6 + (i % 3);
        csv.push_str(&format!("{date},{sales},{},{:.2},S{}\n", 100 - i, 9.9, i % 2));
    }
    // One unparseable date, kept out of the feature table.
    csv.push_str("not-a-date,55,1,9.90,S0\n");
    fs::write(path, csv).unwrap();
}

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig::default()
        .with_output_dir(dir)
        .with_input_path(dir.join("data/retail_dataset.csv"))
        .with_n_trees(8)
}

#[test]
fn test_train_then_predict() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_parquet_path(dir.path().join("outputs/features.parquet"));
    fs::create_dir_all(dir.path().join("data")).unwrap();
    write_dataset(&config.input_path, 90);

    let outcome = run_training(&config).unwrap();
    assert!(config.artifact_path.is_file());
    assert!(config.metrics_path.is_file());
    assert!(config.eda_path.is_file());
    assert!(dir.path().join("outputs/features.parquet").is_file());

    assert_eq!(outcome.features.len(), 90);
    assert_eq!(outcome.features.dropped_null_dates, 1);
    assert_eq!(outcome.report.test_rows, 18);
    assert_eq!(outcome.report.train_rows, 72);
    assert_eq!(outcome.report.models.len(), 2);
    // 2024-01-01 is a national holiday.
    assert!(outcome.features.rows[0].record.holiday);

    let metrics: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.metrics_path).unwrap()).unwrap();
    assert_eq!(metrics["persisted_model"], "random_forest");
    assert!(metrics["models"][1]["metrics"]["rmse"].is_number());

    let output = run_prediction(&config).unwrap();
    assert_eq!(output.predictions.len(), 90);

    // Predictions match the persisted model applied to freshly prepared data.
    let artifact = load_artifact(&config.artifact_path).unwrap();
    let raw = storage::read_raw_csv(&config.input_path).unwrap();
    let features = prepare_features(raw, &config).unwrap();
    let expected = artifact.estimator.predict_batch(&features.design_matrix()).unwrap();
    assert_eq!(output.predictions, expected);

    let exported = storage::read_raw_csv(&config.predictions_path).unwrap();
    assert_eq!(exported.len(), 90);
    assert_eq!(exported.headers().last().map(String::as_str), Some("sales_predicted"));
    assert!(exported.has_column("loja"));
    assert!(exported.has_column("rolling_mean_7d"));
    let dates = exported.column("date").unwrap();
    assert_eq!(dates.first(), Some(&"2024-01-01"));
    assert_eq!(dates.last(), Some(&"2024-03-30"));
}

#[test]
fn test_schema_violation_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(&config.input_path, "data,estoque\n2024-01-02,4\n").unwrap();

    let err = run_training(&config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Data(DataError::Schema { ref column, .. }) if column == "sales"
    ));
    assert!(!config.artifact_path.exists());
    assert!(!config.eda_path.exists());
    assert!(!config.metrics_path.exists());
}

#[test]
fn test_training_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(dir.path().join("data")).unwrap();
    write_dataset(&config.input_path, 40);

    run_training(&config).unwrap();
    let first = fs::read(&config.artifact_path).unwrap();
    let first_predictions = run_prediction(&config).unwrap().predictions;

    run_training(&config).unwrap();
    let second = fs::read(&config.artifact_path).unwrap();
    let second_predictions = run_prediction(&config).unwrap().predictions;

    assert_eq!(first, second);
    assert_eq!(first_predictions, second_predictions);
}

#[test]
fn test_predict_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(dir.path().join("data")).unwrap();
    write_dataset(&config.input_path, 10);

    let err = run_prediction(&config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Storage(StorageError::ArtifactNotFound(_))
    ));
    assert!(!config.predictions_path.exists());
}

#[test]
fn test_stale_artifact_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::create_dir_all(dir.path().join("data")).unwrap();
    write_dataset(&config.input_path, 30);

    let trained = run_training(&config).unwrap().artifact;
    let stale = ModelArtifact {
        feature_names: trained.feature_names[..8].to_vec(),
        ..trained
    };
    save_artifact(&config.artifact_path, &stale).unwrap();

    let err = run_prediction(&config).unwrap_err();
    assert!(matches!(err, PipelineError::FeatureMismatch { .. }));
}

#[test]
fn test_weekly_rolling_mean_and_uplift() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    // 2024-03-04..2024-03-10 has no national holidays.
    let mut csv = String::from("data,venda,promotion\n");
    for (i, sales) in [10, 20, 10, 20, 10, 20, 10].iter().enumerate() {
        csv.push_str(&format!("2024-03-{:02},{sales},0\n", 4 + i));
    }
    csv.push_str("2024-03-11,100,1\n");
    fs::write(&path, csv).unwrap();

    let raw = storage::read_raw_csv(&path).unwrap();
    let table = prepare_features(raw, &PipelineConfig::default()).unwrap();

    assert!(table.rows.iter().all(|r| !r.record.holiday));
    assert!((table.rows[6].rolling_mean_7d - 100.0 / 7.0).abs() < 1e-9);
    assert_eq!(table.rows[0].rolling_mean_7d, 10.0);
    assert_eq!(table.rows[7].record.sales, 140);
}
