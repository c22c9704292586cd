//! Error types, one per stage of a training run.

use std::path::PathBuf;

use thiserror::Error;

use crate::math::ShapeError;

/// Problems with the input arrays, detected before any model is touched.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{which} array is empty")]
    Empty { which: &'static str },

    #[error("{which} array has {cols} column(s); need at least one feature column and the label column")]
    TooFewColumns { which: &'static str, cols: usize },

    #[error("train array has {train} columns but test array has {test}")]
    ColumnMismatch { train: usize, test: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("failed to read array artifact {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },

    #[error("failed to write array artifact {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },

    #[error("failed to parse {path} line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{which} array has a non-finite value at row {row}, column {col}")]
    NonFinite {
        which: &'static str,
        row: usize,
        col: usize,
    },

    #[error("unsupported array format for {0} (expected .json, .bin, .csv or .tsv)")]
    UnsupportedFormat(PathBuf),
}

/// Failures raised by an individual classifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model is not fitted")]
    NotFitted,

    #[error("cannot fit on an empty training set")]
    NoSamples,

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("model was fitted on {expected} features but got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("label {0} is not an integral class identifier")]
    NonIntegralLabel(f32),

    #[error("invalid hyper-parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Metric computation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("cannot score an empty prediction set")]
    Empty,

    #[error("{truth} true labels but {predicted} predictions")]
    LengthMismatch { truth: usize, predicted: usize },
}

/// Failures while fitting or scoring the registry.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("labels are not usable class identifiers")]
    InvalidLabels(#[source] ModelError),

    #[error("fitting {model} failed")]
    Fit {
        model: String,
        #[source]
        source: ModelError,
    },

    #[error("predicting with {model} failed")]
    Predict {
        model: String,
        #[source]
        source: ModelError,
    },

    #[error("scoring {model} failed")]
    Score {
        model: String,
        #[source]
        source: MetricError,
    },

    #[error("score report has no usable score")]
    EmptyReport,

    #[error("model {0} is not in the registry")]
    UnknownModel(String),

    #[error("selected model {0} was never fitted")]
    Unfitted(String),
}

/// Failures while writing or reading an artifact.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode/decode {path} as JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode/decode {path} as bincode")]
    Bincode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

/// The single wrapped failure surfaced by `Trainer::train`.
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("invalid input arrays")]
    InvalidInput(#[source] DataError),

    #[error("model training failed")]
    Evaluation(#[source] EvaluationError),

    #[error("failed to persist the best model")]
    Persistence(#[source] PersistenceError),
}

impl From<DataError> for TrainerError {
    fn from(e: DataError) -> Self {
        TrainerError::InvalidInput(e)
    }
}

impl From<EvaluationError> for TrainerError {
    fn from(e: EvaluationError) -> Self {
        TrainerError::Evaluation(e)
    }
}

impl From<PersistenceError> for TrainerError {
    fn from(e: PersistenceError) -> Self {
        TrainerError::Persistence(e)
    }
}
