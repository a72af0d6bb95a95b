//! Pipeline errors.

use models::ModelError;
use storage::StorageError;
use thiserror::Error;
use types::DataError;

/// Any failure of a training or prediction run. All are fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("model artifact expects features {found:?}, current feature order is {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("dataset has no rows with a valid date")]
    EmptyDataset,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
