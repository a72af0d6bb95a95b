//! Random forest regressor.
//!
//! # Training
//!
//! 1. Seed one generator from `seed`
//! 2. For each tree, draw `n` row indices with replacement
//! 3. Grow a [`RegressionTree`] on that bootstrap sample
//!
//! # Prediction
//!
//! The mean of all tree outputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decision_tree::{RegressionTree, TreeParams};
use crate::{ModelError, Regressor, Result, check_input, check_training_data};

/// Default ensemble size.
pub const DEFAULT_N_TREES: usize = 100;

/// Bootstrap-aggregated regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_trees: usize,
    seed: u64,
    tree_params: TreeParams,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(DEFAULT_N_TREES, 42)
    }
}

impl RandomForest {
    pub fn new(n_trees: usize, seed: u64) -> Self {
        Self {
            n_trees,
            seed,
            tree_params: TreeParams::default(),
            n_features: 0,
            trees: Vec::new(),
        }
    }

    /// Builder-style growth limits for every tree.
    pub fn with_tree_params(mut self, params: TreeParams) -> Self {
        self.tree_params = params;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Check a forest that did not come from [`fit`]: every tree must be
    /// non-empty, agree on the feature count and pass
    /// [`RegressionTree::validate`].
    ///
    /// [`fit`]: Regressor::fit
    pub fn validate(&self) -> Result<()> {
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.nodes().is_empty() {
                return Err(ModelError::InvalidModel(format!("tree {i} has no nodes")));
            }
            if tree.n_features() != self.n_features {
                return Err(ModelError::InvalidModel(format!(
                    "tree {i} expects {} features, forest expects {}",
                    tree.n_features(),
                    self.n_features
                )));
            }
            tree.validate()?;
        }
        Ok(())
    }
}

impl Regressor for RandomForest {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if self.n_trees == 0 {
            return Err(ModelError::InvalidParameter(
                "n_trees must be at least 1".into(),
            ));
        }
        let n_features = check_training_data(x, y)?;
        let n = x.len();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut tree = RegressionTree::new(self.tree_params);
            tree.fit_indices(x, y, &sample)?;
            trees.push(tree);
        }

        debug!(
            n_trees = trees.len(),
            n_rows = n,
            mean_leaves = trees.iter().map(|t| t.n_leaves()).sum::<usize>() as f64
                / trees.len() as f64,
            max_depth = trees.iter().map(|t| t.depth()).max().unwrap_or(0),
            "Random forest fitted"
        );

        self.trees = trees;
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        check_input(features, self.n_features)?;

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_step() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..60).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let y: Vec<f64> = (0..60)
            .map(|i| (if i < 30 { 10.0 } else { 50.0 }) + (i % 3) as f64)
            .collect();
        (x, y)
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = noisy_step();
        let mut forest = RandomForest::new(20, 42);
        forest.fit(&x, &y).unwrap();

        assert_eq!(forest.trees().len(), 20);
        assert!(forest.predict(&[5.0, 5.0]).unwrap() < 20.0);
        assert!(forest.predict(&[55.0, 6.0]).unwrap() > 40.0);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = noisy_step();
        let mut a = RandomForest::new(10, 7);
        let mut b = RandomForest::new(10, 7);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a, b);

        let mut c = RandomForest::new(10, 8);
        c.fit(&x, &y).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_prediction_within_target_range() {
        let (x, y) = noisy_step();
        let mut forest = RandomForest::new(15, 1);
        forest.fit(&x, &y).unwrap();
        for row in &x {
            let p = forest.predict(row).unwrap();
            assert!((9.999..=52.001).contains(&p), "p = {p}");
        }
    }

    #[test]
    fn test_errors() {
        let forest = RandomForest::new(5, 1);
        assert_eq!(forest.predict(&[1.0]), Err(ModelError::NotFitted));

        let mut empty = RandomForest::new(0, 1);
        assert!(matches!(
            empty.fit(&[vec![1.0]], &[1.0]),
            Err(ModelError::InvalidParameter(_))
        ));

        let (x, y) = noisy_step();
        let mut forest = RandomForest::new(3, 1);
        forest.fit(&x, &y).unwrap();
        assert!(matches!(
            forest.predict(&[1.0]),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let (x, y) = noisy_step();
        let mut forest = RandomForest::new(4, 3);
        forest.fit(&x, &y).unwrap();

        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForest = serde_json::from_str(&json).unwrap();
        for row in &x {
            assert_eq!(restored.predict(row).unwrap(), forest.predict(row).unwrap());
        }
    }

    #[test]
    fn test_validate() {
        let (x, y) = noisy_step();
        let mut forest = RandomForest::new(3, 5);
        forest.fit(&x, &y).unwrap();
        assert!(forest.validate().is_ok());

        let mut json = serde_json::to_value(&forest).unwrap();
        json["trees"][1]["n_features"] = serde_json::json!(9);
        let mismatched: RandomForest = serde_json::from_value(json).unwrap();
        assert!(matches!(mismatched.validate(), Err(ModelError::InvalidModel(_))));

        let mut json = serde_json::to_value(&forest).unwrap();
        json["trees"][0]["nodes"][0]["left"] = serde_json::json!(7);
        json["trees"][0]["nodes"][0]["right"] = serde_json::json!(8);
        let root = json["trees"][0]["nodes"][0].clone();
        json["trees"][0]["nodes"] = serde_json::json!([root]);
        let dangling: RandomForest = serde_json::from_value(json).unwrap();
        assert!(matches!(dangling.validate(), Err(ModelError::InvalidModel(_))));
    }
}
