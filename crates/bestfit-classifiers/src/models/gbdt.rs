use std::fmt;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data_handling::unique_classes;
use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::{
    argmax_first, check_fit_input, check_predict_input, ClassifierModel,
};

/// Gradient Boosting Decision Tree (GBDT) classifier.
///
/// The boosters are binary, so every class gets its own one-vs-rest booster
/// trained on labels of +1 (this class) and -1 (any other class). Prediction
/// picks the class whose booster gives the largest decision value.
#[derive(Serialize, Deserialize)]
pub struct GBDTClassifier {
    pub learning_rate: f32,
    pub max_depth: u32,
    pub num_boost_round: u32,
    pub debug: bool,
    pub training_optimization_level: u8,
    pub loss_type: String,
    boosters: Vec<GBDT>,
    classes: Vec<i32>,
    n_features: usize,
}

impl GBDTClassifier {
    pub fn new(
        learning_rate: f32,
        max_depth: u32,
        num_boost_round: u32,
        debug: bool,
        training_optimization_level: u8,
        loss_type: impl Into<String>,
    ) -> Self {
        GBDTClassifier {
            learning_rate,
            max_depth,
            num_boost_round,
            debug,
            training_optimization_level,
            loss_type: loss_type.into(),
            boosters: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
        }
    }

    fn config(&self, feature_size: usize) -> Config {
        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_shrinkage(self.learning_rate);
        config.set_max_depth(self.max_depth);
        config.set_iterations(self.num_boost_round as usize);
        config.set_debug(self.debug);
        config.set_training_optimization_level(self.training_optimization_level);
        config.set_loss(&self.loss_type);
        config
    }

    fn to_data_vec(x: &Array2<f32>, labels: impl Iterator<Item = f32>) -> DataVec {
        let mut data = DataVec::new();
        for (row, label) in x.rows().zip(labels) {
            data.push(Data::new_training_data(row.to_vec(), 1.0, label, None));
        }
        data
    }
}

impl ClassifierModel for GBDTClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), ModelError> {
        check_fit_input(x, y)?;
        if self.num_boost_round == 0 {
            return Err(ModelError::InvalidParameter {
                name: "num_boost_round",
                reason: "must be at least 1".to_string(),
            });
        }

        let classes = unique_classes(y);
        let config = self.config(x.ncols());

        // A single class needs no booster; prediction falls back to it.
        let mut boosters = Vec::new();
        if classes.len() > 1 {
            for &class in &classes {
                let mut train_x =
                    Self::to_data_vec(x, y.iter().map(|&l| if l == class { 1.0 } else { -1.0 }));
                let mut gbdt = GBDT::new(&config);
                gbdt.fit(&mut train_x);
                boosters.push(gbdt);
            }
        }

        debug!(
            "gbdt fitted: {} booster(s) for {} class(es), {} rounds each",
            boosters.len(),
            classes.len(),
            self.num_boost_round
        );

        self.boosters = boosters;
        self.classes = classes;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::NotFitted);
        }
        check_predict_input(x, self.n_features)?;
        if self.boosters.is_empty() {
            return Ok(vec![self.classes[0]; x.nrows()]);
        }

        let test_x = Self::to_data_vec(x, std::iter::repeat(0.0));
        let margins: Vec<Vec<f32>> = self
            .boosters
            .iter()
            .map(|booster| booster.decision_function(&test_x))
            .collect();

        let mut per_class = vec![0f32; self.classes.len()];
        let predictions = (0..x.nrows())
            .map(|row| {
                for (slot, margin) in per_class.iter_mut().zip(&margins) {
                    *slot = margin[row];
                }
                self.classes[argmax_first(&per_class)]
            })
            .collect();
        Ok(predictions)
    }

    fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    fn name(&self) -> &str {
        "gradient_boosting"
    }
}

impl fmt::Debug for GBDTClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GBDTClassifier")
            .field("learning_rate", &self.learning_rate)
            .field("max_depth", &self.max_depth)
            .field("num_boost_round", &self.num_boost_round)
            .field("loss_type", &self.loss_type)
            .field("boosters", &self.boosters.len())
            .field("classes", &self.classes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> GBDTClassifier {
        GBDTClassifier::new(0.1, 3, 20, false, 2, "LogLikelyhood")
    }

    #[test]
    fn test_gbdt_classifier() {
        // Create a feature matrix with 5 features and 10 samples
        let x = Array2::from_shape_vec(
            (10, 5),
            vec![
                0.1, 1.0, 5.0, 0.2, -0.3, 0.4, -1.0, 5.0, 0.8, 0.1, 0.6, 1.0, 5.0, 1.2, 0.2, 0.9,
                -1.0, 5.0, 1.8, -0.1, 1.2, 1.0, 5.0, 2.4, 0.3, 1.5, -1.0, 5.0, 3.0, 0.0, 1.8, 1.0,
                5.0, 3.6, -0.2, 2.1, -1.0, 5.0, 4.2, 0.4, 2.4, 1.0, 5.0, 4.8, -0.1, 2.7, -1.0, 5.0,
                5.4, 0.2,
            ],
        )
        .unwrap();

        // Target perfectly correlated with the second feature
        let y: Vec<i32> = x.column(1).iter().map(|&v| if v > 0.0 { 1 } else { 0 }).collect();

        let mut model = classifier();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions.len(), y.len());
        assert_eq!(predictions, y);
    }

    #[test]
    fn single_class_predicts_that_class() {
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let mut model = classifier();
        model.fit(&x, &[4, 4, 4]).unwrap();
        assert!(model.is_fitted());
        assert_eq!(model.predict(&x).unwrap(), vec![4, 4, 4]);
    }

    #[test]
    fn predict_before_fit_errors() {
        let x = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
        assert_eq!(classifier().predict(&x).unwrap_err(), ModelError::NotFitted);
    }
}
