//! Persisted model artifact.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "model_name": "random_forest",
//!   "feature_names": ["day_of_week", "week_of_year", ...],
//!   "estimator": { "model_type": "random_forest", "n_trees": 100, "trees": [...] }
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use models::{Estimator, Regressor};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StorageError, ensure_parent_dir};

/// A fitted estimator plus the feature list it was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_name: String,
    /// Input feature names in the order the estimator expects them.
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    pub fn new(estimator: Estimator, feature_names: &[&str]) -> Self {
        Self {
            model_name: estimator.name().to_string(),
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            estimator,
        }
    }

    /// Whether the artifact was trained on exactly `expected`, in order.
    pub fn matches_features(&self, expected: &[&str]) -> bool {
        self.feature_names.len() == expected.len()
            && self.feature_names.iter().zip(expected).all(|(a, b)| a == b)
    }
}

/// Write an artifact as JSON, creating parent directories as needed.
pub fn save_artifact<P: AsRef<Path>>(path: P, artifact: &ModelArtifact) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(StorageError::io(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, artifact)?;
    writer.flush().map_err(StorageError::io(path))?;

    info!(
        path = %path.display(),
        model = %artifact.model_name,
        "Saved model artifact"
    );
    Ok(())
}

/// Load an artifact and check its model structure.
///
/// # Errors
/// - [`StorageError::ArtifactNotFound`] when nothing exists at `path`
/// - [`StorageError::InvalidArtifact`] when the model has dangling node links
///   or inconsistent feature counts
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(StorageError::ArtifactNotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(StorageError::io(path))?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))?;
    artifact
        .estimator
        .validate()
        .map_err(|source| StorageError::InvalidArtifact {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        model = %artifact.model_name,
        "Loaded model artifact"
    );
    Ok(artifact)
}
