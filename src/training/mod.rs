//! Levenberg-Marquardt training: the trainer, Hessian engines, the SSE
//! evaluator, and the outer session driver.

pub mod hessian;
pub mod marquardt;
pub mod session;
pub mod sse;

use std::fmt;
use std::io;

pub use hessian::{ChainRuleHessian, FiniteDifferenceHessian, HessianSource, ThreadControl};
pub use marquardt::{IterationOutcome, IterationSummary, MarquardtTrainer, TrainingCheckpoint};
pub use session::{train, TrainingReport};
pub use sse::sum_squared_error;

/// Errors raised by trainer construction and capability requests.
///
/// Numerical singularity is deliberately absent: a damped Hessian that
/// fails to decompose is recovered inside the iteration by escalating
/// damping, never surfaced to the caller.
#[derive(Debug)]
pub enum TrainError {
    /// Network input arity disagrees with the training data.
    InputSizeMismatch { network: usize, data: usize },
    /// Network output arity disagrees with the training data.
    IdealSizeMismatch { network: usize, data: usize },
    /// The Hessian engine only supports single-output networks.
    UnsupportedOutputCount { outputs: usize },
    /// The training set has no samples.
    EmptyTrainingSet,
    /// Thread-count access against an engine without a threading capability.
    ThreadingUnsupported,
    /// Pause or resume requested; optimizer state is not checkpointable.
    CheckpointUnsupported,
    /// A training log record could not be written.
    Log(io::Error),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::InputSizeMismatch { network, data } => write!(
                f,
                "network expects {network} inputs but the training set provides {data}"
            ),
            TrainError::IdealSizeMismatch { network, data } => write!(
                f,
                "network produces {network} outputs but the training set expects {data}"
            ),
            TrainError::UnsupportedOutputCount { outputs } => write!(
                f,
                "this Hessian engine requires a single output neuron, got {outputs}"
            ),
            TrainError::EmptyTrainingSet => write!(f, "training set is empty"),
            TrainError::ThreadingUnsupported => {
                write!(f, "the Hessian engine has no threading capability")
            }
            TrainError::CheckpointUnsupported => {
                write!(f, "training cannot be paused or resumed")
            }
            TrainError::Log(err) => write!(f, "failed to write training log: {err}"),
        }
    }
}

impl std::error::Error for TrainError {}

impl From<io::Error> for TrainError {
    fn from(value: io::Error) -> Self {
        TrainError::Log(value)
    }
}
