//! Training run.
//!
//! 1. Load and prepare the dataset
//! 2. Summarize it (EDA)
//! 3. Seeded 80/20 split
//! 4. Fit the linear baseline and the random forest on the same partition
//! 5. Score both on the test partition
//! 6. Persist the forest, the metrics report and optional exports
//!
//! The forest is always the persisted model; the baseline is reported only.

use models::{Estimator, LinearRegression, RandomForest, Regressor, TrainTestSplit, train_test_split};
use serde::Serialize;
use stats::RegressionMetrics;
use storage::ModelArtifact;
use tracing::info;
use types::{FEATURE_NAMES, FeatureTable};

use crate::config::PipelineConfig;
use crate::eda::EdaSummary;
use crate::error::{PipelineError, Result};
use crate::prepare_features;

/// Test-partition scores for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub model_name: String,
    pub metrics: RegressionMetrics,
}

/// Metrics report written next to the artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub seed: u64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_names: Vec<String>,
    pub models: Vec<ModelReport>,
    pub persisted_model: String,
}

/// Everything a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: TrainingReport,
    pub eda: EdaSummary,
    pub features: FeatureTable,
}

/// Split, fit both estimators and score them.
///
/// Returns the forest artifact and the report; nothing is written.
pub fn train(table: &FeatureTable, config: &PipelineConfig) -> Result<(ModelArtifact, TrainingReport)> {
    let x = table.design_matrix();
    let y = table.targets();

    let split = train_test_split(x.len(), config.test_fraction, config.seed)?;
    let x_train = TrainTestSplit::select(&split.train, &x);
    let y_train = TrainTestSplit::select(&split.train, &y);
    let x_test = TrainTestSplit::select(&split.test, &x);
    let y_test = TrainTestSplit::select(&split.test, &y);
    info!(
        train_rows = x_train.len(),
        test_rows = x_test.len(),
        "Train/test split"
    );

    let mut baseline = Estimator::from(LinearRegression::new());
    let mut forest = Estimator::from(RandomForest::new(config.n_trees, config.seed));

    let models = vec![
        fit_and_score(&mut baseline, &x_train, &y_train, &x_test, &y_test)?,
        fit_and_score(&mut forest, &x_train, &y_train, &x_test, &y_test)?,
    ];

    let artifact = ModelArtifact::new(forest, FEATURE_NAMES);
    let report = TrainingReport {
        seed: config.seed,
        train_rows: x_train.len(),
        test_rows: x_test.len(),
        feature_names: artifact.feature_names.clone(),
        models,
        persisted_model: artifact.model_name.clone(),
    };
    Ok((artifact, report))
}

fn fit_and_score(
    estimator: &mut Estimator,
    x_train: &[Vec<f64>],
    y_train: &[f64],
    x_test: &[Vec<f64>],
    y_test: &[f64],
) -> Result<ModelReport> {
    estimator.fit(x_train, y_train)?;
    let y_pred = estimator.predict_batch(x_test)?;
    let metrics = RegressionMetrics::evaluate(y_test, &y_pred).ok_or(PipelineError::EmptyDataset)?;

    info!(
        model = estimator.name(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "Model evaluated"
    );
    Ok(ModelReport {
        model_name: estimator.name().to_string(),
        metrics,
    })
}

/// Full training run: read, prepare, summarize, train, persist.
///
/// Schema and date errors surface before anything is written.
pub fn run_training(config: &PipelineConfig) -> Result<TrainingOutcome> {
    let raw = storage::read_raw_csv(&config.input_path)?;
    let features = prepare_features(raw, config)?;

    let eda = EdaSummary::from_table(&features);
    eda.log();
    storage::write_json(&config.eda_path, &eda)?;

    let (artifact, report) = train(&features, config)?;

    storage::save_artifact(&config.artifact_path, &artifact)?;
    storage::write_json(&config.metrics_path, &report)?;
    if let Some(parquet_path) = &config.parquet_path {
        storage::write_feature_parquet(parquet_path, &features, None)?;
    }

    info!(
        artifact = %config.artifact_path.display(),
        model = %artifact.model_name,
        "Training complete"
    );

    Ok(TrainingOutcome {
        artifact,
        report,
        eda,
        features,
    })
}
