//! Core types for the demand-forecast workspace.
//!
//! This crate is the single source of truth for the tabular data model and
//! the model feature schema. Both the training run and the prediction run
//! build their inputs from the constants and pure functions defined here,
//! which keeps the two sides from drifting apart.
//!
//! # Modules
//!
//! - [`raw`] - Untyped CSV-shaped table (headers + string cells)
//! - [`schema`] - Column names, source-language rename map, date policy
//! - [`record`] - Typed sales records produced by enrichment
//! - [`features`] - Derived feature schema, calendar features, feature table
//! - [`error`] - Data-level errors (schema violations, date parsing)

pub mod error;
pub mod features;
pub mod raw;
pub mod record;
pub mod schema;

pub use error::{DataError, Result};
pub use features::{
    CalendarFeatures, DERIVED_COLUMNS, FEATURE_NAMES, FeatureRow, FeatureTable, N_MODEL_FEATURES,
    ROLLING_MEAN_7D, ROLLING_WINDOW,
};
pub use raw::RawTable;
pub use record::{SalesRecord, SalesTable};
pub use schema::DatePolicy;
