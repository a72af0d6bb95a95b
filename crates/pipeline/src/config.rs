//! Central configuration for training and prediction runs.
//!
//! Defaults reproduce the fixed paths and constants of the batch job; every
//! value can be overridden through the builder setters (the CLI maps its
//! flags and `FORECAST_*` variables onto these).

use std::path::PathBuf;

use features::{DEFAULT_PROMOTION_PROBABILITY, DEFAULT_UPLIFT_FACTOR, EnrichmentConfig};
use models::DEFAULT_N_TREES;
use types::DatePolicy;

/// Master configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Paths
    // ─────────────────────────────────────────────────────────────────────────
    /// Source CSV (training data, or new data for prediction).
    pub input_path: PathBuf,
    /// Persisted model artifact.
    pub artifact_path: PathBuf,
    /// Prediction output CSV.
    pub predictions_path: PathBuf,
    /// Training metrics report (JSON).
    pub metrics_path: PathBuf,
    /// EDA summary (JSON).
    pub eda_path: PathBuf,
    /// Optional Parquet copy of the feature table.
    pub parquet_path: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Enrichment
    // ─────────────────────────────────────────────────────────────────────────
    /// Seed for promotion synthesis, the split and the forest.
    pub seed: u64,
    /// Probability of a synthesized promotion day.
    pub promotion_probability: f64,
    /// Sales multiplier on promotion days.
    pub uplift_factor: f64,
    /// Unparseable date handling.
    pub date_policy: DatePolicy,

    // ─────────────────────────────────────────────────────────────────────────
    // Training
    // ─────────────────────────────────────────────────────────────────────────
    /// Share of rows held out for evaluation.
    pub test_fraction: f64,
    /// Trees in the random forest.
    pub n_trees: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/retail_dataset.csv"),
            artifact_path: PathBuf::from("models/random_forest.json"),
            predictions_path: PathBuf::from("outputs/sales_predictions.csv"),
            metrics_path: PathBuf::from("outputs/training_metrics.json"),
            eda_path: PathBuf::from("outputs/eda_summary.json"),
            parquet_path: None,
            seed: 42,
            promotion_probability: DEFAULT_PROMOTION_PROBABILITY,
            uplift_factor: DEFAULT_UPLIFT_FACTOR,
            date_policy: DatePolicy::Lenient,
            test_fraction: 0.2,
            n_trees: DEFAULT_N_TREES,
        }
    }
}

impl PipelineConfig {
    /// Enrichment settings derived from this configuration.
    pub fn enrichment(&self) -> EnrichmentConfig {
        EnrichmentConfig {
            promotion_probability: self.promotion_probability,
            uplift_factor: self.uplift_factor,
            date_policy: self.date_policy,
        }
    }

    /// Place every output under `dir`, keeping the default file names.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.artifact_path = dir.join("models/random_forest.json");
        self.predictions_path = dir.join("outputs/sales_predictions.csv");
        self.metrics_path = dir.join("outputs/training_metrics.json");
        self.eda_path = dir.join("outputs/eda_summary.json");
        self
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    pub fn with_predictions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.predictions_path = path.into();
        self
    }

    pub fn with_metrics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_path = path.into();
        self
    }

    pub fn with_eda_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.eda_path = path.into();
        self
    }

    pub fn with_parquet_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.parquet_path = Some(path.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_promotion_probability(mut self, p: f64) -> Self {
        self.promotion_probability = p;
        self
    }

    pub fn with_uplift_factor(mut self, factor: f64) -> Self {
        self.uplift_factor = factor;
        self
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }
}
