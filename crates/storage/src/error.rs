//! Storage errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading or writing datasets and artifacts.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invalid model artifact at {}: {source}", path.display())]
    InvalidArtifact {
        path: PathBuf,
        #[source]
        source: models::ModelError,
    },

    #[error("model artifact not found at {} (run training first)", .0.display())]
    ArtifactNotFound(PathBuf),
}

impl StorageError {
    /// Wrap an I/O error with the path it happened on.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Create the parent directory of `path` if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(StorageError::io(parent))
        }
        _ => Ok(()),
    }
}
