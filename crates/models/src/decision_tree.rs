//! CART regression tree.
//!
//! Nodes live in a flat vector and reference their children by index, so a
//! fitted tree serializes as a plain node list:
//!
//! ```json
//! { "feature": 7, "threshold": 0.5, "left": 1, "right": 2, "value": 112.4, "n_samples": 300 }
//! { "feature": -1, "threshold": 0.0, "left": -1, "right": -1, "value": 98.0, "n_samples": 4 }
//! ```
//!
//! # Growing
//!
//! - Split criterion: sum of squared errors of the two children (lowest wins)
//! - Candidate thresholds: midpoints between consecutive distinct sorted values
//! - Ties between candidates keep the first found (lowest feature, lowest threshold)
//! - A node becomes a leaf when it is pure, smaller than `min_samples_split`,
//!   at `max_depth`, or has no split leaving `min_samples_leaf` on each side
//!
//! # Traversal
//!
//! - If `feature == -1`, return `value`
//! - If `x[feature] <= threshold` or `NaN`, go left; otherwise right

use serde::{Deserialize, Serialize};

use crate::{ModelError, Regressor, Result, check_input, check_training_data};

/// A single node. Leaves have `feature == -1` and no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index to split on (-1 for leaf nodes).
    pub feature: i32,
    /// Threshold value for the split.
    pub threshold: f64,
    /// Index of left child (-1 for leaf nodes).
    pub left: i32,
    /// Index of right child (-1 for leaf nodes).
    pub right: i32,
    /// Mean target of the training samples that reached this node.
    pub value: f64,
    /// Number of training samples (with bootstrap repeats) at this node.
    pub n_samples: usize,
}

impl TreeNode {
    fn leaf(value: f64, n_samples: usize) -> Self {
        Self {
            feature: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            value,
            n_samples,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.feature == -1
    }
}

/// Growth limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples required in each child.
    pub min_samples_leaf: usize,
    /// Maximum depth (root = 0). `None` grows until the other limits stop it.
    pub max_depth: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_depth: None,
        }
    }
}

/// Regression tree grown by recursive binary partitioning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    params: TreeParams,
    n_features: usize,
    nodes: Vec<TreeNode>,
}

/// Best split found for one node.
struct Split {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            n_features: 0,
            nodes: Vec::new(),
        }
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Nodes in creation order; index 0 is the root.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(idx) else {
                continue;
            };
            if node.is_leaf() {
                deepest = deepest.max(depth);
            } else {
                for child in [node.left as usize, node.right as usize] {
                    if child > idx {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
        deepest
    }

    /// Check the node links of a tree that did not come from [`fit`].
    ///
    /// Every split must name a feature below `n_features` and point to
    /// children stored after it, so traversal always ends on a leaf.
    ///
    /// [`fit`]: Regressor::fit
    pub fn validate(&self) -> Result<()> {
        let n_nodes = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                continue;
            }
            if node.feature < 0 || node.feature as usize >= self.n_features {
                return Err(ModelError::InvalidModel(format!(
                    "node {i} has invalid feature index {}",
                    node.feature
                )));
            }
            for (side, child) in [("left", node.left), ("right", node.right)] {
                if child <= i as i32 || child as usize >= n_nodes {
                    return Err(ModelError::InvalidModel(format!(
                        "node {i} has invalid {side} child {child} ({n_nodes} nodes)"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fit on the rows of `x` named by `indices`. Repeated indices weigh a
    /// row multiple times, which is how bootstrap samples are passed in.
    pub fn fit_indices(&mut self, x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Result<()> {
        let n_features = check_training_data(x, y)?;
        if indices.is_empty() {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= x.len()) {
            return Err(ModelError::DimensionMismatch {
                expected: x.len(),
                actual: bad + 1,
            });
        }
        if self.params.min_samples_leaf == 0 || self.params.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_leaf must be >= 1 and min_samples_split >= 2, got {} and {}",
                self.params.min_samples_leaf, self.params.min_samples_split
            )));
        }

        self.n_features = n_features;
        self.nodes.clear();
        self.nodes.push(TreeNode::leaf(0.0, 0));

        // Work stack of (node index, samples, depth).
        let mut stack = vec![(0usize, indices.to_vec(), 0usize)];
        while let Some((node_idx, samples, depth)) = stack.pop() {
            let (value, sse) = mean_and_sse(y, &samples);
            self.nodes[node_idx] = TreeNode::leaf(value, samples.len());

            if samples.len() < self.params.min_samples_split
                || samples.len() < 2 * self.params.min_samples_leaf
                || self.params.max_depth.is_some_and(|max| depth >= max)
                || sse <= f64::EPSILON * value.abs().max(1.0)
            {
                continue;
            }

            let Some(split) = self.best_split(x, y, &samples) else {
                continue;
            };

            let (left, right): (Vec<usize>, Vec<usize>) = samples
                .iter()
                .partition(|&&i| goes_left(x[i][split.feature], split.threshold));

            let left_idx = self.nodes.len();
            self.nodes.push(TreeNode::leaf(0.0, 0));
            let right_idx = self.nodes.len();
            self.nodes.push(TreeNode::leaf(0.0, 0));

            let node = &mut self.nodes[node_idx];
            node.feature = split.feature as i32;
            node.threshold = split.threshold;
            node.left = left_idx as i32;
            node.right = right_idx as i32;

            stack.push((right_idx, right, depth + 1));
            stack.push((left_idx, left, depth + 1));
        }

        Ok(())
    }

    fn best_split(&self, x: &[Vec<f64>], y: &[f64], samples: &[usize]) -> Option<Split> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf;
        let total_sum: f64 = samples.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = samples.iter().map(|&i| y[i] * y[i]).sum();

        let mut best: Option<Split> = None;
        let mut order = samples.to_vec();

        for feature in 0..self.n_features {
            order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 0..(n - 1) {
                let yi = y[order[k]];
                left_sum += yi;
                left_sq += yi * yi;

                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let lo = x[order[k]][feature];
                let hi = x[order[k + 1]][feature];
                if !(lo < hi) {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if best.as_ref().map_or(true, |b| sse < b.sse) {
                    best = Some(Split {
                        feature,
                        threshold: midpoint(lo, hi),
                        sse,
                    });
                }
            }
        }

        best
    }

    /// Traverse the tree for given features and return leaf node index.
    #[inline]
    fn traverse(&self, features: &[f64]) -> usize {
        let mut node_idx = 0usize;
        loop {
            let node = &self.nodes[node_idx];
            if node.is_leaf() {
                return node_idx;
            }
            let value = features
                .get(node.feature as usize)
                .copied()
                .unwrap_or(f64::NAN);
            node_idx = if goes_left(value, node.threshold) {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }
}

impl Regressor for RegressionTree {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let indices: Vec<usize> = (0..x.len()).collect();
        self.fit_indices(x, y, &indices)
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if self.nodes.is_empty() {
            return Err(ModelError::NotFitted);
        }
        check_input(features, self.n_features)?;
        Ok(self.nodes[self.traverse(features)].value)
    }

    fn name(&self) -> &str {
        "regression_tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[inline]
fn goes_left(value: f64, threshold: f64) -> bool {
    value.is_nan() || value <= threshold
}

/// Midpoint of two distinct sorted values that still separates them.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi { lo } else { mid }
}

fn mean_and_sse(y: &[f64], samples: &[usize]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&i| y[i]).sum::<f64>() / n;
    let sse = samples.iter().map(|&i| (y[i] - mean).powi(2)).sum();
    (mean, sse)
}
