//! Prediction run.
//!
//! Loads the persisted artifact, refuses it if its feature list differs from
//! the current one, prepares the new data exactly like training did (same
//! seed, same calendar) and appends `sales_predicted`.

use models::Regressor;
use storage::ModelArtifact;
use tracing::info;
use types::{FEATURE_NAMES, FeatureTable, RawTable};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::prepare_features;

/// Feature table plus one prediction per row, in row order.
#[derive(Debug, Clone)]
pub struct PredictionOutput {
    pub features: FeatureTable,
    pub predictions: Vec<f64>,
}

/// Predict sales for a raw dataset with an already-loaded artifact.
///
/// # Errors
/// - [`PipelineError::FeatureMismatch`] when the artifact's features differ
/// - [`PipelineError::Data`] for schema violations, raised before the
///   estimator is invoked
pub fn predict(
    raw: RawTable,
    artifact: &ModelArtifact,
    config: &PipelineConfig,
) -> Result<PredictionOutput> {
    if !artifact.matches_features(FEATURE_NAMES) {
        return Err(PipelineError::FeatureMismatch {
            expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            found: artifact.feature_names.clone(),
        });
    }

    let features = prepare_features(raw, config)?;
    let predictions = artifact.estimator.predict_batch(&features.design_matrix())?;

    info!(
        rows = predictions.len(),
        model = %artifact.model_name,
        "Predictions computed"
    );
    Ok(PredictionOutput {
        features,
        predictions,
    })
}

/// Full prediction run: load artifact, read input, predict, export.
pub fn run_prediction(config: &PipelineConfig) -> Result<PredictionOutput> {
    let artifact = storage::load_artifact(&config.artifact_path)?;
    let raw = storage::read_raw_csv(&config.input_path)?;
    let output = predict(raw, &artifact, config)?;

    storage::write_feature_csv(
        &config.predictions_path,
        &output.features,
        Some(&output.predictions),
    )?;
    if let Some(parquet_path) = &config.parquet_path {
        storage::write_feature_parquet(parquet_path, &output.features, Some(&output.predictions))?;
    }

    info!(
        output = %config.predictions_path.display(),
        rows = output.predictions.len(),
        "Prediction complete"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Estimator, LinearRegression};
    use types::DataError;

    fn linear_artifact(feature_names: &[&str]) -> ModelArtifact {
        let x: Vec<Vec<f64>> = (0..12)
            .map(|i| {
                let mut row = vec![0.0; FEATURE_NAMES.len()];
                row[0] = (i % 7) as f64;
                row
            })
            .collect();
        let y: Vec<f64> = x.iter().map(|r| 10.0 + r[0]).collect();
        let mut model = Estimator::from(LinearRegression::new());
        model.fit(&x, &y).unwrap();
        ModelArtifact::new(model, feature_names)
    }

    fn raw() -> RawTable {
        RawTable::from_str_rows(
            &["data", "venda"],
            &[&["2024-03-05", "12"], &["2024-03-04", "10"], &["bad", "1"]],
        )
    }

    #[test]
    fn test_predicts_in_date_order() {
        let config = PipelineConfig::default().with_promotion_probability(0.0);
        let out = predict(raw(), &linear_artifact(FEATURE_NAMES), &config).unwrap();

        assert_eq!(out.features.len(), 2);
        assert_eq!(out.features.dropped_null_dates, 1);
        // 2024-03-04 is a Monday (0), 2024-03-05 a Tuesday (1).
        assert!((out.predictions[0] - 10.0).abs() < 1e-9);
        assert!((out.predictions[1] - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_feature_mismatch() {
        let mut reordered: Vec<&str> = FEATURE_NAMES.to_vec();
        reordered.swap(0, 1);
        let err = predict(raw(), &linear_artifact(&reordered), &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_schema_error_before_prediction() {
        let no_sales = RawTable::from_str_rows(&["data", "estoque"], &[&["2024-03-05", "4"]]);
        let err = predict(no_sales, &linear_artifact(FEATURE_NAMES), &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Data(DataError::Schema { .. })));
    }
}
