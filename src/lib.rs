//! # Marquardt Core
//!
//! A Levenberg-Marquardt (damped Gauss-Newton) training engine for dense
//! feed-forward networks. A pluggable Hessian engine supplies curvature,
//! gradient, and sum-squared error each iteration; the trainer damps the
//! Hessian diagonal, solves the resulting linear system by LU
//! decomposition, and keeps a candidate update only when it strictly
//! reduces the error.
//!
//! ## Quick Start
//!
//! ```rust
//! use marquardt_core::{
//!     xor_dataset, Activation, ChainRuleHessian, FeedForwardNetwork,
//!     MarquardtConfig, MarquardtTrainer,
//! };
//!
//! let network = FeedForwardNetwork::from_seed(
//!     42,
//!     &[2, 3, 1],
//!     Activation::Sigmoid,
//!     Activation::Sigmoid,
//! );
//! let mut trainer = MarquardtTrainer::new(
//!     network,
//!     xor_dataset(),
//!     Box::new(ChainRuleHessian::new()),
//!     MarquardtConfig::default(),
//! )
//! .expect("network and dataset shapes match");
//!
//! let summary = trainer.iteration();
//! assert!(summary.error.is_finite());
//! ```
//!
//! ## Core Modules
//!
//! - [`config`] - Trainer configuration via TOML
//! - [`data`] - Training sets and benchmark datasets
//! - [`logging`] - JSON line-delimited training logs
//! - [`network`] - Feed-forward network and parameter marshaling
//! - [`solver`] - LU decomposition for the damped linear system
//! - [`training`] - The Levenberg-Marquardt trainer and Hessian engines

pub mod config;
pub mod data;
pub mod logging;
pub mod network;
pub mod solver;
pub mod training;

pub use config::{ConfigError, MarquardtConfig, SessionConfig};
pub use data::{linear_dataset, xor_dataset, DataError, TrainingSet};
pub use logging::{IterationRecord, TrainingLogger};
pub use network::{Activation, FeedForwardNetwork, ForwardTrace, Layer};
pub use solver::LuDecomposition;
pub use training::{
    sum_squared_error, train, ChainRuleHessian, FiniteDifferenceHessian, HessianSource,
    IterationOutcome, IterationSummary, MarquardtTrainer, ThreadControl, TrainError,
    TrainingCheckpoint, TrainingReport,
};
