//! Regression models for daily sales.
//!
//! This crate provides:
//! - [`LinearRegression`]: ordinary least squares baseline
//! - [`RegressionTree`]: CART tree with squared-error splits
//! - [`RandomForest`]: bootstrap-aggregated regression trees
//! - [`Estimator`]: serializable union of the persisted model kinds
//! - [`train_test_split`]: seeded shuffled holdout split
//!
//! All models implement [`Regressor`] and are plain serde structs, so a fitted
//! model round-trips through JSON without any loss.
//!
//! # Usage
//!
//! ```ignore
//! use models::{RandomForest, Regressor};
//!
//! let mut forest = RandomForest::new(100, 42);
//! forest.fit(&x_train, &y_train)?;
//! let y_hat = forest.predict_batch(&x_test)?;
//! ```

mod decision_tree;
mod error;
mod estimator;
mod linear;
mod random_forest;
mod split;

pub use decision_tree::{RegressionTree, TreeNode, TreeParams};
pub use error::{ModelError, Result};
pub use estimator::Estimator;
pub use linear::LinearRegression;
pub use random_forest::{DEFAULT_N_TREES, RandomForest};
pub use split::{TrainTestSplit, train_test_split};

/// Trait for regressors mapping a feature vector to one real value.
pub trait Regressor {
    /// Fit on a row-major design matrix and its targets.
    ///
    /// # Errors
    /// - [`ModelError::InsufficientData`] for an empty matrix
    /// - [`ModelError::DimensionMismatch`] for ragged rows or `x.len() != y.len()`
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict one row.
    ///
    /// # Errors
    /// - [`ModelError::NotFitted`] before a successful `fit`
    /// - [`ModelError::DimensionMismatch`] when `features.len() != n_features()`
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Predict every row of a matrix.
    fn predict_batch(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        x.iter().map(|row| self.predict(row)).collect()
    }

    /// Model name for logging and reports.
    fn name(&self) -> &str;

    /// Number of features the model was fitted on (0 before fitting).
    fn n_features(&self) -> usize;
}

/// Validate a training set and return its feature width.
pub(crate) fn check_training_data(x: &[Vec<f64>], y: &[f64]) -> Result<usize> {
    if x.is_empty() {
        return Err(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if x.len() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let width = x[0].len();
    if let Some(row) = x.iter().find(|row| row.len() != width) {
        return Err(ModelError::DimensionMismatch {
            expected: width,
            actual: row.len(),
        });
    }
    Ok(width)
}

/// Reject an input row of the wrong width.
pub(crate) fn check_input(features: &[f64], n_features: usize) -> Result<()> {
    if features.len() != n_features {
        return Err(ModelError::DimensionMismatch {
            expected: n_features,
            actual: features.len(),
        });
    }
    Ok(())
}
