//! Ordinary least squares.
//!
//! Solves the normal equations on mean-centered data, so the intercept is
//! `mean(y) - coef · mean(x)`. Columns that are constant or linearly dependent
//! on earlier columns get a zero coefficient instead of failing the fit.

use serde::{Deserialize, Serialize};

use crate::{ModelError, Regressor, Result, check_input, check_training_data};

/// Relative pivot tolerance below which a column is treated as redundant.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Linear regression `y = intercept + Σ coef_j · x_j`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    fitted: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted coefficients in feature order (empty before fitting).
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let p = check_training_data(x, y)?;
        let n = x.len() as f64;

        let x_mean: Vec<f64> = (0..p)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Normal equations on centered data: (XᵀX) β = Xᵀy
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, &target) in x.iter().zip(y) {
            let yc = target - y_mean;
            for i in 0..p {
                let xi = row[i] - x_mean[i];
                xty[i] += xi * yc;
                for j in i..p {
                    xtx[i][j] += xi * (row[j] - x_mean[j]);
                }
            }
        }
        for i in 0..p {
            for j in 0..i {
                xtx[i][j] = xtx[j][i];
            }
        }

        let coefficients = solve_symmetric(xtx, xty);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        self.coefficients = coefficients;
        self.intercept = intercept;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        check_input(features, self.coefficients.len())?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    fn name(&self) -> &str {
        "linear_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

/// Gaussian elimination on a symmetric positive semi-definite system.
///
/// Pivots at or below the tolerance mark a redundant column whose solution
/// component is fixed at zero.
fn solve_symmetric(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let p = b.len();
    let scale = a
        .iter()
        .enumerate()
        .map(|(i, row)| row[i])
        .fold(1.0_f64, f64::max);
    let tolerance = PIVOT_TOLERANCE * scale;
    let mut active = vec![false; p];

    for k in 0..p {
        if a[k][k] <= tolerance {
            continue;
        }
        active[k] = true;
        for i in (k + 1)..p {
            let factor = a[i][k] / a[k][k];
            if factor == 0.0 {
                continue;
            }
            for j in k..p {
                a[i][j] -= factor * a[k][j];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut solution = vec![0.0; p];
    for k in (0..p).rev() {
        if !active[k] {
            continue;
        }
        let tail: f64 = ((k + 1)..p).map(|j| a[k][j] * solution[j]).sum();
        solution[k] = (b[k] - tail) / a[k][k];
    }
    solution
}
