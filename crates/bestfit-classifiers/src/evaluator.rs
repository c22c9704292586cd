//! Fitting and scoring every registry entry on a holdout split.

use std::fmt;

use log::{debug, info};
use rayon::prelude::*;

use crate::config::Metric;
use crate::data_handling::{labels_to_classes, DatasetSplit};
use crate::error::EvaluationError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::registry::{ModelRegistry, RegistryEntry};

/// Per-model scores in registry order. Higher is better.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreReport {
    entries: Vec<(String, f64)>,
}

impl ScoreReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, score: f64) {
        self.entries.push((name.into(), score));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ScoreReport {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (name, score)) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.4}", name, score)?;
        }
        write!(f, "}}")
    }
}

/// Fits each registry entry and reports its score on the test split.
///
/// Implementations must evaluate every entry and leave the fitted models in
/// the registry so the caller can persist the winner.
pub trait Evaluator {
    fn evaluate(
        &self,
        split: &DatasetSplit,
        registry: &mut ModelRegistry,
    ) -> Result<ScoreReport, EvaluationError>;
}

/// Fit on the train split, score predictions on the test split with a fixed
/// metric. The first failing model fails the whole evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldoutEvaluator {
    pub metric: Metric,
    pub parallel: bool,
}

impl HoldoutEvaluator {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn fit_and_score(
        &self,
        entry: &mut RegistryEntry,
        split: &DatasetSplit,
        y_train: &[i32],
        y_test: &[i32],
    ) -> Result<f64, EvaluationError> {
        let name = entry.name;
        debug!("fitting {}", name);
        entry
            .model
            .fit(&split.x_train, y_train)
            .map_err(|source| EvaluationError::Fit {
                model: name.to_string(),
                source,
            })?;

        let predicted = entry
            .model
            .predict(&split.x_test)
            .map_err(|source| EvaluationError::Predict {
                model: name.to_string(),
                source,
            })?;

        let score = self
            .metric
            .score(y_test, &predicted)
            .map_err(|source| EvaluationError::Score {
                model: name.to_string(),
                source,
            })?;
        info!("{} {} = {:.4}", name, self.metric, score);
        Ok(score)
    }
}

impl Evaluator for HoldoutEvaluator {
    fn evaluate(
        &self,
        split: &DatasetSplit,
        registry: &mut ModelRegistry,
    ) -> Result<ScoreReport, EvaluationError> {
        let y_train =
            labels_to_classes(split.y_train.as_slice()).map_err(EvaluationError::InvalidLabels)?;
        let y_test =
            labels_to_classes(split.y_test.as_slice()).map_err(EvaluationError::InvalidLabels)?;

        let scores: Vec<f64> = if self.parallel {
            registry
                .entries_mut()
                .par_iter_mut()
                .map(|entry| self.fit_and_score(entry, split, &y_train, &y_test))
                .collect::<Result<_, _>>()?
        } else {
            registry
                .entries_mut()
                .iter_mut()
                .map(|entry| self.fit_and_score(entry, split, &y_train, &y_test))
                .collect::<Result<_, _>>()?
        };

        let report: ScoreReport = registry
            .entries()
            .iter()
            .zip(scores)
            .map(|(entry, score)| (entry.name, score))
            .collect();
        Ok(report)
    }
}
