//! Readers for the upstream array artifacts.
pub mod arrays;

pub use arrays::{read_array, write_array};
