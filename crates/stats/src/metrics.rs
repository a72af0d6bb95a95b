//! Regression error metrics.

use serde::{Deserialize, Serialize};

use crate::summary::mean;

/// Mean absolute error. `None` for empty or mismatched inputs.
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let total: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    Some(total / y_true.len() as f64)
}

/// Root mean squared error. `None` for empty or mismatched inputs.
pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let total: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    Some((total / y_true.len() as f64).sqrt())
}

/// Coefficient of determination.
///
/// With a constant target the score is 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let y_mean = mean(y_true)?;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

/// MAE, RMSE and R² for one model on one partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Score predictions against the truth. `None` for empty or mismatched inputs.
    pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Option<Self> {
        Some(Self {
            mae: mean_absolute_error(y_true, y_pred)?,
            rmse: root_mean_squared_error(y_true, y_pred)?,
            r2: r2_score(y_true, y_pred)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::evaluate(&y, &y).unwrap();
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.r2, 1.0);
    }

    #[test]
    fn test_known_values() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];
        assert!((mean_absolute_error(&y_true, &y_pred).unwrap() - 0.5).abs() < 1e-12);
        assert!((root_mean_squared_error(&y_true, &y_pred).unwrap() - 0.375f64.sqrt()).abs() < 1e-12);
        assert!((r2_score(&y_true, &y_pred).unwrap() - 0.948_608_137_044_967_9).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 2.0]), Some(1.0));
        assert_eq!(r2_score(&[2.0, 2.0], &[1.0, 3.0]), Some(0.0));
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(RegressionMetrics::evaluate(&[1.0], &[1.0, 2.0]).is_none());
        assert!(RegressionMetrics::evaluate(&[], &[]).is_none());
    }
}
