use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::DecisionTreeClassifier;
use crate::models::gbdt::GBDTClassifier;
use crate::models::random_forest::RandomForestClassifier;

/// Closed set of model families. This is the value written to the model
/// artifact, so a loaded file knows which family it holds.
#[derive(Debug, Serialize, Deserialize)]
pub enum Classifier {
    RandomForest(RandomForestClassifier),
    GradientBoosting(GBDTClassifier),
    DecisionTree(DecisionTreeClassifier),
}

impl Classifier {
    fn inner(&self) -> &dyn ClassifierModel {
        match self {
            Classifier::RandomForest(m) => m,
            Classifier::GradientBoosting(m) => m,
            Classifier::DecisionTree(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ClassifierModel {
        match self {
            Classifier::RandomForest(m) => m,
            Classifier::GradientBoosting(m) => m,
            Classifier::DecisionTree(m) => m,
        }
    }
}

impl ClassifierModel for Classifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), ModelError> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, ModelError> {
        self.inner().predict(x)
    }

    fn is_fitted(&self) -> bool {
        self.inner().is_fitted()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}
