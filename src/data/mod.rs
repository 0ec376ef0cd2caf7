//! Datasets and pattern generation for network training.

pub mod pattern;
pub mod training_set;

pub use pattern::{linear_dataset, xor_dataset};
pub use training_set::{DataError, TrainingSet};
