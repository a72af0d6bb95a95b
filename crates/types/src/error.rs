//! Data-level errors.

use thiserror::Error;

/// Result type for data-shaping operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while shaping raw input into typed tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A required column is missing after renaming.
    #[error("missing required column '{column}' (available: {})", available.join(", "))]
    Schema {
        column: String,
        available: Vec<String>,
    },

    /// A date cell could not be parsed (strict date policy only).
    #[error("unparseable date '{value}' at row {row}")]
    DateParse { row: usize, value: String },
}
