//! One training run: split, evaluate the registry, keep the best, persist it.

use std::path::PathBuf;

use log::{info, warn};

use crate::config::TrainerConfig;
use crate::data_handling::DatasetSplit;
use crate::error::{EvaluationError, TrainerError};
use crate::evaluator::{Evaluator, HoldoutEvaluator, ScoreReport};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::registry::ModelRegistry;
use crate::persistence::{FileModelStore, ModelStore};

/// Summary of a successful run. The persisted artifact is the real output.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    pub best_model: String,
    pub best_score: f64,
    pub report: ScoreReport,
    pub model_path: PathBuf,
}

/// Highest score in the report. The first maximum in report order wins a tie;
/// NaN never wins.
pub fn select_best(report: &ScoreReport) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (name, score) in report.iter() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((name, score));
        }
    }
    best
}

pub struct Trainer<E = HoldoutEvaluator, S = FileModelStore> {
    config: TrainerConfig,
    evaluator: E,
    store: S,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        let evaluator = HoldoutEvaluator::new(config.metric).with_parallel(config.parallel);
        Self {
            config,
            evaluator,
            store: FileModelStore,
        }
    }
}

impl<E: Evaluator, S: ModelStore> Trainer<E, S> {
    pub fn with_evaluator<E2: Evaluator>(self, evaluator: E2) -> Trainer<E2, S> {
        Trainer {
            config: self.config,
            evaluator,
            store: self.store,
        }
    }

    pub fn with_store<S2: ModelStore>(self, store: S2) -> Trainer<E, S2> {
        Trainer {
            config: self.config,
            evaluator: self.evaluator,
            store,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fit the registry on `train`, score on `test`, and write the best model
    /// to `model_save_path`. The last column of both arrays is the label.
    ///
    /// Nothing is written unless every model fitted and scored.
    pub fn train(
        &self,
        train: &Array2<f32>,
        test: &Array2<f32>,
    ) -> Result<TrainingOutcome, TrainerError> {
        self.run(train, test).map_err(|e| {
            warn!("Error happened in the model trainer: {}", e);
            e
        })
    }

    fn run(&self, train: &Array2<f32>, test: &Array2<f32>) -> Result<TrainingOutcome, TrainerError> {
        info!("model trainer started");

        let split = DatasetSplit::from_arrays(train, test)?;
        info!(
            "split into {} train / {} test samples with {} features",
            split.x_train.nrows(),
            split.x_test.nrows(),
            split.n_features()
        );

        let mut registry = ModelRegistry::with_defaults(self.config.random_state);
        info!(
            "evaluating {} models: {}",
            registry.len(),
            registry.names().join(", ")
        );
        let report = self.evaluator.evaluate(&split, &mut registry)?;
        info!("model report: {}", report);

        let (best_name, best_score) = select_best(&report)
            .map(|(name, score)| (name.to_string(), score))
            .ok_or(EvaluationError::EmptyReport)?;
        let model = registry
            .take(&best_name)
            .ok_or_else(|| EvaluationError::UnknownModel(best_name.clone()))?;
        if !model.is_fitted() {
            return Err(EvaluationError::Unfitted(best_name).into());
        }
        info!(
            "best model: {} with {} = {:.4}",
            best_name, self.config.metric, best_score
        );

        let path = &self.config.model_save_path;
        self.store.save(path, &model)?;
        info!("model saved to {}", path.display());

        Ok(TrainingOutcome {
            best_model: best_name,
            best_score,
            report,
            model_path: path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(entries: &[(&str, f64)]) -> ScoreReport {
        entries.iter().map(|&(n, s)| (n, s)).collect()
    }

    #[test]
    fn picks_the_maximum() {
        let r = report(&[("a", 0.2), ("b", 0.9), ("c", 0.4)]);
        assert_eq!(select_best(&r), Some(("b", 0.9)));
    }

    #[test]
    fn ties_go_to_the_first_entry() {
        let r = report(&[("a", 0.7), ("b", 0.91), ("c", 0.91)]);
        assert_eq!(select_best(&r), Some(("b", 0.91)));
    }

    #[test]
    fn nan_never_wins() {
        let r = report(&[("a", f64::NAN), ("b", 0.1)]);
        assert_eq!(select_best(&r), Some(("b", 0.1)));
        assert_eq!(select_best(&report(&[("a", f64::NAN)])), None);
        assert_eq!(select_best(&ScoreReport::new()), None);
    }
}
