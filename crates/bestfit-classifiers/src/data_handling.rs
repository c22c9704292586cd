//! Splitting train/test arrays into features and labels.
use log::debug;

use crate::error::{DataError, ModelError};
use crate::math::{Array1, Array2};

/// Features and labels for both halves of a run.
///
/// Labels are the raw values of the last column; the evaluator converts them
/// to class identifiers with [`labels_to_classes`].
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub x_train: Array2<f32>,
    pub y_train: Array1<f32>,
    pub x_test: Array2<f32>,
    pub y_test: Array1<f32>,
}

impl DatasetSplit {
    /// Validate both arrays and split off their last column.
    ///
    /// Both arrays need at least one row, at least two columns and the same
    /// column count. Row counts may differ.
    pub fn from_arrays(train: &Array2<f32>, test: &Array2<f32>) -> Result<Self, DataError> {
        validate(train, "train")?;
        validate(test, "test")?;
        if train.ncols() != test.ncols() {
            return Err(DataError::ColumnMismatch {
                train: train.ncols(),
                test: test.ncols(),
            });
        }

        let (x_train, y_train) = split_features_labels(train);
        let (x_test, y_test) = split_features_labels(test);
        debug!(
            "split train {:?} -> x {:?}, test {:?} -> x {:?}",
            train.shape(),
            x_train.shape(),
            test.shape(),
            x_test.shape()
        );

        Ok(Self {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }

    pub fn n_features(&self) -> usize {
        self.x_train.ncols()
    }
}

fn validate(array: &Array2<f32>, which: &'static str) -> Result<(), DataError> {
    if array.nrows() == 0 {
        return Err(DataError::Empty { which });
    }
    if array.ncols() < 2 {
        return Err(DataError::TooFewColumns {
            which,
            cols: array.ncols(),
        });
    }
    if let Some(pos) = array.as_slice().iter().position(|v| !v.is_finite()) {
        return Err(DataError::NonFinite {
            which,
            row: pos / array.ncols(),
            col: pos % array.ncols(),
        });
    }
    Ok(())
}

/// All columns but the last are features; the last column is the label.
pub fn split_features_labels(array: &Array2<f32>) -> (Array2<f32>, Array1<f32>) {
    let label_col = array.ncols() - 1;
    (array.select_columns(..label_col), array.column(label_col))
}

/// Convert raw label values to integral class identifiers.
pub fn labels_to_classes(labels: &[f32]) -> Result<Vec<i32>, ModelError> {
    labels
        .iter()
        .map(|&v| {
            if v.is_finite() && v.fract() == 0.0 && v.abs() <= i32::MAX as f32 {
                Ok(v as i32)
            } else {
                Err(ModelError::NonIntegralLabel(v))
            }
        })
        .collect()
}

/// Sorted, de-duplicated class identifiers.
pub fn unique_classes(y: &[i32]) -> Vec<i32> {
    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(rows: usize, cols: usize) -> Array2<f32> {
        Array2::from_shape_vec((rows, cols), (0..rows * cols).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn splits_last_column_off() {
        let split = DatasetSplit::from_arrays(&array(4, 3), &array(2, 3)).unwrap();
        assert_eq!(split.x_train.shape(), (4, 2));
        assert_eq!(split.y_train.to_vec(), vec![2.0, 5.0, 8.0, 11.0]);
        assert_eq!(split.x_test.shape(), (2, 2));
        assert_eq!(split.n_features(), 2);
    }

    #[test]
    fn rejects_single_column() {
        let err = DatasetSplit::from_arrays(&array(4, 1), &array(2, 1)).unwrap_err();
        assert!(matches!(err, DataError::TooFewColumns { which: "train", cols: 1 }));
    }

    #[test]
    fn rejects_empty_test() {
        let err = DatasetSplit::from_arrays(&array(4, 3), &array(0, 3)).unwrap_err();
        assert!(matches!(err, DataError::Empty { which: "test" }));
    }

    #[test]
    fn rejects_column_mismatch() {
        let err = DatasetSplit::from_arrays(&array(4, 3), &array(2, 4)).unwrap_err();
        assert!(matches!(err, DataError::ColumnMismatch { train: 3, test: 4 }));
    }

    #[test]
    fn rejects_nan_features() {
        let mut train = array(3, 3);
        train[(1, 0)] = f32::NAN;
        let err = DatasetSplit::from_arrays(&train, &array(2, 3)).unwrap_err();
        assert!(matches!(err, DataError::NonFinite { which: "train", row: 1, col: 0 }));
    }

    #[test]
    fn non_integral_labels_are_rejected() {
        assert_eq!(labels_to_classes(&[0.0, 1.0, 2.0]).unwrap(), vec![0, 1, 2]);
        assert_eq!(
            labels_to_classes(&[0.0, 0.5]).unwrap_err(),
            ModelError::NonIntegralLabel(0.5)
        );
        assert!(labels_to_classes(&[f32::NAN]).is_err());
    }
}
