//! CART decision tree classifier with Gini impurity.

use std::ops::Range;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data_handling::unique_classes;
use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::{
    argmax_first, check_fit_input, check_predict_input, ClassifierModel,
};

/// Nodes live in one flat vector and refer to their children by index, so no
/// tree operation recurses once per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        /// Index into the owning model's class list.
        class: usize,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        n_samples: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of features drawn at each split. `None` considers all of them.
    pub max_features: Option<usize>,
    pub random_state: u64,
    /// Root at index 0; empty until fitted.
    nodes: Vec<TreeNode>,
    classes: Vec<i32>,
    n_features: usize,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeClassifier {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            random_state: 0,
            nodes: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn classes(&self) -> &[i32] {
        &self.classes
    }

    /// Number of splits on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut pending = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = pending.pop() {
            match &self.nodes[idx] {
                TreeNode::Leaf { .. } => deepest = deepest.max(depth),
                TreeNode::Split { left, right, .. } => {
                    pending.push((*left, depth + 1));
                    pending.push((*right, depth + 1));
                }
            }
        }
        deepest
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    fn check_params(&self) -> Result<(), ModelError> {
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter {
                name: "min_samples_leaf",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_features == Some(0) {
            return Err(ModelError::InvalidParameter {
                name: "max_features",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Grow the tree on the rows named by `samples` (repeats allowed, which is
    /// how a forest passes its bootstrap draw). `y` holds indices into
    /// `classes`, one per row of `x`.
    pub(crate) fn fit_indexed(
        &mut self,
        x: &Array2<f32>,
        y: &[usize],
        classes: Vec<i32>,
        mut samples: Vec<usize>,
    ) {
        self.n_features = x.ncols();
        self.classes = classes;
        let mut rng = StdRng::seed_from_u64(self.random_state);

        // Every node starts as a leaf and is replaced once it splits. Each
        // pending entry owns a contiguous range of `samples`.
        let mut nodes = vec![self.leaf(y, &samples)];
        let mut pending: Vec<(usize, Range<usize>, usize)> = vec![(0, 0..samples.len(), 0)];

        while let Some((slot, range, depth)) = pending.pop() {
            let rows = &mut samples[range.clone()];
            let Some((feature, threshold)) = self.split_for(x, y, rows, depth, &mut rng) else {
                continue;
            };

            // Partition in place: rows going left end up in front.
            let mut boundary = 0;
            for i in 0..rows.len() {
                if x[(rows[i], feature)] <= threshold {
                    rows.swap(i, boundary);
                    boundary += 1;
                }
            }
            let (left_rows, right_rows) = rows.split_at(boundary);

            let left = nodes.len();
            nodes.push(self.leaf(y, left_rows));
            nodes.push(self.leaf(y, right_rows));
            nodes[slot] = TreeNode::Split {
                feature,
                threshold,
                left,
                right: left + 1,
                n_samples: range.len(),
            };

            let mid = range.start + boundary;
            pending.push((left + 1, mid..range.end, depth + 1));
            pending.push((left, range.start..mid, depth + 1));
        }

        self.nodes = nodes;
    }

    fn leaf(&self, y: &[usize], samples: &[usize]) -> TreeNode {
        let counts = class_counts(y, samples, self.classes.len());
        TreeNode::Leaf {
            class: argmax_first(&counts),
            n_samples: samples.len(),
        }
    }

    /// The split to apply to a node holding `samples`, or `None` when it stays a leaf.
    fn split_for(
        &self,
        x: &Array2<f32>,
        y: &[usize],
        samples: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> Option<(usize, f32)> {
        let n_samples = samples.len();
        let counts = class_counts(y, samples, self.classes.len());
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if pure
            || n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
        {
            return None;
        }
        self.best_split(x, y, samples, rng)
    }

    /// Lowest weighted Gini impurity over the candidate features. Returns
    /// `None` when no threshold leaves `min_samples_leaf` rows on both sides.
    fn best_split(
        &self,
        x: &Array2<f32>,
        y: &[usize],
        samples: &[usize],
        rng: &mut StdRng,
    ) -> Option<(usize, f32)> {
        let n_classes = self.classes.len();
        let n = samples.len();
        let features: Vec<usize> = match self.max_features {
            Some(k) if k < self.n_features => {
                rand::seq::index::sample(rng, self.n_features, k).into_vec()
            }
            _ => (0..self.n_features).collect(),
        };

        let total = class_counts(y, samples, n_classes);
        let mut best: Option<(f64, usize, f32)> = None;
        let mut column: Vec<(f32, usize)> = Vec::with_capacity(n);

        for feature in features {
            column.clear();
            column.extend(samples.iter().map(|&s| (x[(s, feature)], y[s])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = vec![0usize; n_classes];
            for i in 0..n - 1 {
                left[column[i].1] += 1;
                let (lo, hi) = (column[i].0, column[i + 1].0);
                if lo == hi {
                    continue;
                }
                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let impurity = weighted_gini(&left, &total, n_left, n);

                if best.map_or(true, |(b, _, _)| impurity < b) {
                    best = Some((impurity, feature, midpoint(lo, hi)));
                }
            }
        }

        best.map(|(_, feature, threshold)| (feature, threshold))
    }

    /// Class index of the leaf reached by `row`.
    pub(crate) fn predict_index(&self, row: &[f32]) -> Result<usize, ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::NotFitted);
        }
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { class, .. } => return Ok(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl ClassifierModel for DecisionTreeClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), ModelError> {
        check_fit_input(x, y)?;
        self.check_params()?;

        let classes = unique_classes(y);
        let y_idx = class_indices(y, &classes);
        self.fit_indexed(x, &y_idx, classes, (0..x.nrows()).collect());
        debug!(
            "decision tree fitted: depth={}, leaves={}",
            self.depth(),
            self.n_leaves()
        );
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::NotFitted);
        }
        check_predict_input(x, self.n_features)?;
        x.rows()
            .map(|row| self.predict_index(row).map(|idx| self.classes[idx]))
            .collect()
    }

    fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}

/// Map each label to its position in the sorted `classes` list.
pub(crate) fn class_indices(y: &[i32], classes: &[i32]) -> Vec<usize> {
    y.iter()
        .map(|label| classes.binary_search(label).unwrap_or_default())
        .collect()
}

fn class_counts(y: &[usize], samples: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &s in samples {
        counts[y[s]] += 1;
    }
    counts
}

/// Gini impurity of splitting `total` into `left` and the rest, weighted by
/// child size. Uses `n_k * gini_k = n_k - sum(c^2) / n_k` per child.
fn weighted_gini(left: &[usize], total: &[usize], n_left: usize, n: usize) -> f64 {
    let n_right = n - n_left;
    let (mut sq_left, mut sq_right) = (0.0f64, 0.0f64);
    for (&l, &t) in left.iter().zip(total) {
        let r = t - l;
        sq_left += (l * l) as f64;
        sq_right += (r * r) as f64;
    }
    (n_left as f64 - sq_left / n_left as f64 + n_right as f64 - sq_right / n_right as f64)
        / n as f64
}

/// Threshold strictly below `hi` so `x <= threshold` keeps `lo` left and `hi` right.
fn midpoint(lo: f32, hi: f32) -> f32 {
    let mid = ((lo as f64 + hi as f64) / 2.0) as f32;
    if mid >= hi {
        lo
    } else {
        mid
    }
}
