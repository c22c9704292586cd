//! bestfit-classifiers: pick the best of a fixed set of classifiers.
//!
//! A run takes a train and a test array (label in the last column), fits a
//! random forest, a gradient-boosted ensemble and a single decision tree,
//! scores each on the test array and persists the highest-scoring fitted
//! model. See [`trainer::Trainer`] for the entry point.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluator;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod persistence;
pub mod trainer;

pub use config::{Metric, ModelType, TrainerConfig};
pub use error::TrainerError;
pub use models::classifier::Classifier;
pub use models::classifier_trait::ClassifierModel;
pub use trainer::{Trainer, TrainingOutcome};
