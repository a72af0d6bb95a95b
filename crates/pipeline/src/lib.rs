//! Training and prediction runs.
//!
//! Both runs share one preparation path so the model always sees the same
//! columns in the same order:
//!
//! ```text
//! CSV ──read_raw_csv──► RawTable ──prepare_features──► FeatureTable
//!                                                        │
//!                       ┌────────────────────────────────┴──────────────┐
//!                       ▼                                               ▼
//!   run_training: EDA, split, fit OLS + forest,           run_prediction: load artifact,
//!   score, persist forest + metrics                       predict, export CSV
//! ```

pub mod config;
pub mod eda;
mod error;
pub mod predict;
pub mod train;

use calendar::{BrazilCalendar, HolidayCalendar};
use features::{Enricher, derive};
use tracing::info;
use types::{FeatureTable, RawTable};

pub use config::PipelineConfig;
pub use eda::EdaSummary;
pub use error::{PipelineError, Result};
pub use predict::{PredictionOutput, predict, run_prediction};
pub use train::{ModelReport, TrainingOutcome, TrainingReport, run_training, train};

/// Enrich and derive features with the national holiday calendar.
pub fn prepare_features(raw: RawTable, config: &PipelineConfig) -> Result<FeatureTable> {
    prepare_features_with(raw, config, BrazilCalendar::new())
}

/// Enrich and derive features against any holiday calendar.
///
/// # Errors
/// - [`PipelineError::Data`] for schema violations or strict date failures
/// - [`PipelineError::EmptyDataset`] when no row has a valid date
pub fn prepare_features_with<C: HolidayCalendar>(
    raw: RawTable,
    config: &PipelineConfig,
    calendar: C,
) -> Result<FeatureTable> {
    let enricher = Enricher::new(calendar, config.enrichment());
    let enriched = enricher.enrich(raw, config.seed)?;
    let table = derive(&enriched);
    if table.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }
    info!(
        rows = table.len(),
        dropped_null_dates = table.dropped_null_dates,
        passthrough = ?table.extra_columns,
        "Feature table ready"
    );
    Ok(table)
}
