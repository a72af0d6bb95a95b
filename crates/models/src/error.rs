//! Model errors.

use thiserror::Error;

/// Errors from fitting or predicting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model has not been fitted")]
    NotFitted,

    #[error("insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
