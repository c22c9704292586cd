//! Random forest: bagged CART trees with per-split feature subsampling.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data_handling::unique_classes;
use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::{
    argmax_first, check_fit_input, check_predict_input, ClassifierModel,
};
use crate::models::decision_tree::{class_indices, DecisionTreeClassifier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
    pub random_state: u64,
    trees: Vec<DecisionTreeClassifier>,
    classes: Vec<i32>,
    n_features: usize,
}

impl RandomForestClassifier {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            random_state: 42,
            trees: Vec::new(),
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

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Features drawn per split: ceil(sqrt(n_features)), at least one.
    fn max_features(n_features: usize) -> usize {
        ((n_features as f64).sqrt().ceil() as usize).max(1)
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), ModelError> {
        check_fit_input(x, y)?;
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter {
                name: "n_estimators",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter {
                name: "min_samples_leaf",
                reason: "must be at least 1".to_string(),
            });
        }

        let n_samples = x.nrows();
        let classes = unique_classes(y);
        let y_idx = class_indices(y, &classes);
        let max_features = Self::max_features(x.ncols());

        // Each tree derives its own seed so the forest is reproducible no
        // matter how rayon schedules the work.
        let trees: Vec<DecisionTreeClassifier> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = self.random_state.wrapping_add(tree_idx as u64);
                let mut rng = StdRng::seed_from_u64(seed);

                let samples: Vec<usize> = if self.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };

                let mut tree = DecisionTreeClassifier::new()
                    .with_max_depth(self.max_depth)
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf)
                    .with_max_features(Some(max_features))
                    .with_random_state(rng.gen());
                tree.fit_indexed(x, &y_idx, classes.clone(), samples);
                tree
            })
            .collect();

        debug!(
            "random forest fitted: {} trees, {} classes, max_features={}",
            trees.len(),
            classes.len(),
            max_features
        );

        self.trees = trees;
        self.classes = classes;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        check_predict_input(x, self.n_features)?;

        let mut predictions = Vec::with_capacity(x.nrows());
        let mut votes = vec![0usize; self.classes.len()];
        for row in x.rows() {
            votes.iter_mut().for_each(|v| *v = 0);
            for tree in &self.trees {
                votes[tree.predict_index(row)?] += 1;
            }
            predictions.push(self.classes[argmax_first(&votes)]);
        }
        Ok(predictions)
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> (Array2<f32>, Vec<i32>) {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            let jitter = (i % 5) as f32 * 0.05;
            let class = i % 3;
            rows.push(vec![class as f32 * 2.0 + jitter, 1.0 - jitter, class as f32 - jitter]);
            y.push(class as i32);
        }
        (Array2::from_rows(rows).unwrap(), y)
    }

    #[test]
    fn separates_three_blobs() {
        let (x, y) = blobs();
        let mut forest = RandomForestClassifier::new(25);
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&x).unwrap(), y);
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = blobs();
        let mut a = RandomForestClassifier::new(10).with_random_state(7);
        let mut b = RandomForestClassifier::new(10).with_random_state(7);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_estimators_is_rejected() {
        let (x, y) = blobs();
        let mut forest = RandomForestClassifier::new(0);
        assert!(matches!(
            forest.fit(&x, &y),
            Err(ModelError::InvalidParameter { name: "n_estimators", .. })
        ));
    }

    #[test]
    fn max_features_rounds_up() {
        assert_eq!(RandomForestClassifier::max_features(1), 1);
        assert_eq!(RandomForestClassifier::max_features(4), 2);
        assert_eq!(RandomForestClassifier::max_features(5), 3);
    }
}
