//! Statistical utilities for the demand-forecast workspace.
//!
//! # Modules
//!
//! - [`rolling`] - Trailing window with running sum
//! - [`summary`] - Mean, variance, quantiles, describe()
//! - [`metrics`] - Regression error metrics (MAE, RMSE, R²)
//!
//! All calculations use `f64`.

pub mod metrics;
pub mod rolling;
pub mod summary;

pub use metrics::{RegressionMetrics, mean_absolute_error, r2_score, root_mean_squared_error};
pub use rolling::{RollingWindow, trailing_means};
pub use summary::{Describe, mean, quantile, sample_std_dev, variance};
