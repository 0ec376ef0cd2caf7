//! Deterministic benchmark datasets.

use ndarray::{array, Array2};

use super::training_set::TrainingSet;

/// The classic 4-sample XOR truth table.
pub fn xor_dataset() -> TrainingSet {
    let inputs = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let ideals = array![[0.0], [1.0], [1.0], [0.0]];
    TrainingSet::new(inputs, ideals).expect("XOR table is well formed")
}

/// Samples of `y = slope * x + intercept` on an even grid over `[0, 1]`.
///
/// # Panics
///
/// Panics if fewer than two samples are requested.
pub fn linear_dataset(samples: usize, slope: f64, intercept: f64) -> TrainingSet {
    assert!(samples >= 2, "a linear dataset needs at least two samples");
    let mut inputs = Array2::zeros((samples, 1));
    let mut ideals = Array2::zeros((samples, 1));
    for k in 0..samples {
        let x = k as f64 / (samples - 1) as f64;
        inputs[[k, 0]] = x;
        ideals[[k, 0]] = slope * x + intercept;
    }
    TrainingSet::new(inputs, ideals).expect("grid is well formed")
}
