use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut, RangeBounds};

use serde::{Deserialize, Serialize};

use crate::math::vector::Array1;

/// Dense row-major matrix. Rows are samples, columns are features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArray2<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Unchecked wire form; converted through `from_shape_vec` so a corrupt
/// artifact cannot produce a matrix whose buffer disagrees with its shape.
#[derive(Deserialize)]
struct RawArray2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> TryFrom<RawArray2<T>> for Array2<T> {
    type Error = ShapeError;

    fn try_from(raw: RawArray2<T>) -> Result<Self, Self::Error> {
        Array2::from_shape_vec((raw.rows, raw.cols), raw.data)
    }
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from row vectors. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ShapeError> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(ShapeError {
                    rows: nrows,
                    cols: ncols,
                    len: data.len() + row.len(),
                });
            }
            data.extend(row);
        }
        Self::from_shape_vec((nrows, ncols), data)
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row_slice(r))
    }

    pub fn column(&self, col: usize) -> Array1<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        let mut values = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            values.push(self[(row, col)].clone());
        }
        Array1::from_vec(values)
    }

    pub fn select_columns<R>(&self, range: R) -> Array2<T>
    where
        R: RangeBounds<usize>,
        T: Clone,
    {
        use std::ops::Bound;

        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
        };

        let end = match range.end_bound() {
            Bound::Unbounded => self.cols,
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
        };

        assert!(
            start <= end && end <= self.cols,
            "column slice out of bounds"
        );

        let new_cols = end - start;
        let mut data = Vec::with_capacity(self.rows * new_cols);
        for row in 0..self.rows {
            data.extend_from_slice(&self.row_slice(row)[start..end]);
        }

        Array2 {
            data,
            rows: self.rows,
            cols: new_cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shape ({}, {}) for buffer of length {}",
            self.rows, self.cols, self.len
        )
    }
}

impl Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_columns_drops_label_column() {
        let m = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 0.0, 3.0, 4.0, 1.0]).unwrap();
        let features = m.select_columns(..2);
        assert_eq!(features.shape(), (2, 2));
        assert_eq!(features.row_slice(1), &[3.0, 4.0]);
        let labels = m.column(2);
        assert_eq!(labels.len(), 2);
        assert!(!labels.is_empty());
        assert_eq!(labels.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(Array2::from_rows(vec![vec![1, 2], vec![3]]).is_err());
        let ok = Array2::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(ok[(1, 0)], 3);
    }

    #[test]
    fn deserialize_validates_shape() {
        let bad = r#"{"data":[1.0,2.0,3.0],"rows":2,"cols":2}"#;
        assert!(serde_json::from_str::<Array2<f32>>(bad).is_err());

        let good = r#"{"data":[1.0,2.0,3.0,4.0],"rows":2,"cols":2}"#;
        let m: Array2<f32> = serde_json::from_str(good).unwrap();
        assert_eq!(m.shape(), (2, 2));
    }
}
