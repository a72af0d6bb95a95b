//! Storage layer for demand-forecast.
//!
//! This crate ONLY handles persistence; no enrichment or modeling logic:
//! - Raw CSV input as [`types::RawTable`]
//! - Feature/prediction CSV export in a fixed column order
//! - Optional Parquet export of the same table
//! - JSON model artifacts

pub mod artifact;
pub mod csv_io;
mod error;
pub mod parquet_writer;

pub use artifact::{ModelArtifact, load_artifact, save_artifact};
pub use csv_io::{output_headers, read_raw, read_raw_csv, write_feature_csv, write_features};
pub use error::{Result, StorageError};
pub use parquet_writer::{FeatureParquetWriter, write_feature_parquet};

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn write_json<P, T>(path: P, value: &T) -> Result<()>
where
    P: AsRef<std::path::Path>,
    T: serde::Serialize + ?Sized,
{
    let path = path.as_ref();
    error::ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(StorageError::io(path))?;
    tracing::info!(path = %path.display(), "Wrote JSON report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/metrics.json");
        write_json(&path, &serde_json::json!({ "mae": 1.5 })).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"mae\": 1.5"));
    }
}
