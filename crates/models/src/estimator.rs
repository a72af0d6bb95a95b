//! Serializable union of the model kinds that can be persisted.
//!
//! The variant is stored inline as `"model_type"`:
//!
//! ```json
//! { "model_type": "random_forest", "n_trees": 100, "seed": 42, "trees": [...] }
//! ```

use serde::{Deserialize, Serialize};

use crate::{LinearRegression, RandomForest, Regressor, Result};

/// A fitted (or unfitted) model of either supported kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum Estimator {
    LinearRegression(LinearRegression),
    RandomForest(RandomForest),
}

impl Estimator {
    /// Structural check for a deserialized model. Linear models carry no
    /// indices and always pass.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::LinearRegression(_) => Ok(()),
            Self::RandomForest(m) => m.validate(),
        }
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            Self::LinearRegression(m) => m,
            Self::RandomForest(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Regressor {
        match self {
            Self::LinearRegression(m) => m,
            Self::RandomForest(m) => m,
        }
    }
}

impl From<LinearRegression> for Estimator {
    fn from(model: LinearRegression) -> Self {
        Self::LinearRegression(model)
    }
}

impl From<RandomForest> for Estimator {
    fn from(model: RandomForest) -> Self {
        Self::RandomForest(model)
    }
}

impl Regressor for Estimator {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        self.inner().predict(features)
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json() {
        let mut model = Estimator::from(LinearRegression::new());
        model.fit(&[vec![0.0], vec![1.0]], &[1.0, 3.0]).unwrap();

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["model_type"], "linear_regression");

        let restored: Estimator = serde_json::from_value(json).unwrap();
        assert_eq!(restored.name(), "linear_regression");
        assert_eq!(restored.predict(&[2.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_forest_variant() {
        let model = Estimator::from(RandomForest::new(3, 1));
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"model_type\":\"random_forest\""));
        assert_eq!(model.name(), "random_forest");
    }
}
