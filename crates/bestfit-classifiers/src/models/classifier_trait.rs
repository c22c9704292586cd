use crate::error::ModelError;
use crate::math::Array2;

/// Contract shared by every model in the registry.
///
/// `y` holds integral class identifiers; any integer is a valid class, the
/// models keep their own sorted class list.
pub trait ClassifierModel {
    /// Fit the model on `x` (samples by features) and `y` (one class per row).
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<(), ModelError>;

    /// Predict one class per row of `x`.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>, ModelError>;

    fn is_fitted(&self) -> bool;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Shared argument checks for `fit`.
pub(crate) fn check_fit_input(x: &Array2<f32>, y: &[i32]) -> Result<(), ModelError> {
    if x.nrows() == 0 {
        return Err(ModelError::NoSamples);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LabelCountMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    Ok(())
}

/// Shared argument checks for `predict`.
pub(crate) fn check_predict_input(x: &Array2<f32>, n_features: usize) -> Result<(), ModelError> {
    if x.ncols() != n_features {
        return Err(ModelError::FeatureCountMismatch {
            expected: n_features,
            actual: x.ncols(),
        });
    }
    Ok(())
}

/// Index of the largest count; the first one wins on ties.
pub(crate) fn argmax_first<T: PartialOrd + Copy>(values: &[T]) -> usize {
    let mut best = 0;
    for (idx, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = idx;
        }
    }
    best
}
