//! Small ndarray-like types used throughout the crate.
//!
//! Provides `Array2` (2D, row-major) and `Array1` (1D) containers with the
//! handful of operations the trainer and the tree models need. Both are
//! serde-serializable so they double as the on-disk array artifact format.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
