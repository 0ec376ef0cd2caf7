//! Fixed training sets with per-sample significance weights.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

/// Errors raised while assembling a training set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// No samples were provided.
    EmptySet,
    /// Input and ideal row counts disagree.
    RowCountMismatch { inputs: usize, ideals: usize },
    /// Significance vector length disagrees with the sample count.
    SignificanceLengthMismatch { samples: usize, significance: usize },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::EmptySet => write!(f, "training set has no samples"),
            DataError::RowCountMismatch { inputs, ideals } => {
                write!(f, "{inputs} input rows but {ideals} ideal rows")
            }
            DataError::SignificanceLengthMismatch {
                samples,
                significance,
            } => write!(
                f,
                "{samples} samples but {significance} significance weights"
            ),
        }
    }
}

impl std::error::Error for DataError {}

/// An immutable, row-indexable training set.
///
/// Each sample is an (input, ideal, significance) triple; significance
/// scales the sample's contribution to the sum-squared error. The set is
/// fixed for the lifetime of a trainer: no rows are added or removed.
#[derive(Clone, Debug)]
pub struct TrainingSet {
    inputs: Array2<f64>,
    ideals: Array2<f64>,
    significance: Array1<f64>,
}

impl TrainingSet {
    /// Build a set where every sample has significance 1.0.
    pub fn new(inputs: Array2<f64>, ideals: Array2<f64>) -> Result<Self, DataError> {
        let samples = inputs.nrows();
        Self::with_significance(inputs, ideals, Array1::ones(samples))
    }

    /// Build a set with explicit per-sample significance weights.
    pub fn with_significance(
        inputs: Array2<f64>,
        ideals: Array2<f64>,
        significance: Array1<f64>,
    ) -> Result<Self, DataError> {
        if inputs.nrows() == 0 {
            return Err(DataError::EmptySet);
        }
        if inputs.nrows() != ideals.nrows() {
            return Err(DataError::RowCountMismatch {
                inputs: inputs.nrows(),
                ideals: ideals.nrows(),
            });
        }
        if significance.len() != inputs.nrows() {
            return Err(DataError::SignificanceLengthMismatch {
                samples: inputs.nrows(),
                significance: significance.len(),
            });
        }
        Ok(Self {
            inputs,
            ideals,
            significance,
        })
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn input_size(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn ideal_size(&self) -> usize {
        self.ideals.ncols()
    }

    pub fn input(&self, index: usize) -> ArrayView1<f64> {
        self.inputs.row(index)
    }

    pub fn ideal(&self, index: usize) -> ArrayView1<f64> {
        self.ideals.row(index)
    }

    pub fn significance(&self, index: usize) -> f64 {
        self.significance[index]
    }
}
