//! The Levenberg-Marquardt trainer: damping control and the iteration
//! state machine.
//!
//! Each call to [`MarquardtTrainer::iteration`] runs one outer cycle:
//! compute curvature at the current weights, then retry damped
//! Gauss-Newton steps, escalating the damping factor tenfold on every
//! rejection, until a step strictly reduces the error or the damping
//! ceiling is reached.

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::config::MarquardtConfig;
use crate::data::TrainingSet;
use crate::network::FeedForwardNetwork;
use crate::solver::LuDecomposition;
use crate::training::hessian::HessianSource;
use crate::training::sse::sum_squared_error;
use crate::training::TrainError;

/// How an iteration's inner retry loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationOutcome {
    /// A damped step strictly reduced the error and was kept.
    Accepted,
    /// Damping reached its ceiling without an improving step. The last
    /// attempted candidate, if any, remains installed.
    LambdaCeiling,
}

/// Summary of one outer training iteration.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct IterationSummary {
    /// Error reported for this iteration: the SSE after the final attempt.
    pub error: f64,
    /// Damping factor after the iteration completed.
    pub lambda: f64,
    /// Rejected damping retries before the loop ended.
    pub retries: usize,
    pub outcome: IterationOutcome,
}

/// Opaque training checkpoint.
///
/// The trainer cannot produce one: optimizer state is not resumable, so
/// [`MarquardtTrainer::pause`] always fails and no value of this type is
/// obtainable by callers.
#[derive(Debug)]
pub struct TrainingCheckpoint {
    _private: (),
}

/// Levenberg-Marquardt trainer for a feed-forward network.
///
/// Owns the network, the training set, the damping factor, and a
/// pluggable [`HessianSource`]. The damping factor persists across
/// iterations and only ever changes by the configured scale factor.
pub struct MarquardtTrainer {
    network: FeedForwardNetwork,
    samples: TrainingSet,
    engine: Box<dyn HessianSource>,
    config: MarquardtConfig,
    lambda: f64,
    weights: Array1<f64>,
    diagonal: Array1<f64>,
    error: f64,
}

impl MarquardtTrainer {
    /// Build a trainer, validating network/data shapes and initializing
    /// the Hessian engine. Fails before any iteration can run if the
    /// network's input or output arity disagrees with the training set,
    /// or if the engine rejects the network.
    pub fn new(
        network: FeedForwardNetwork,
        samples: TrainingSet,
        mut engine: Box<dyn HessianSource>,
        config: MarquardtConfig,
    ) -> Result<Self, TrainError> {
        if samples.is_empty() {
            return Err(TrainError::EmptyTrainingSet);
        }
        if network.input_count() != samples.input_size() {
            return Err(TrainError::InputSizeMismatch {
                network: network.input_count(),
                data: samples.input_size(),
            });
        }
        if network.output_count() != samples.ideal_size() {
            return Err(TrainError::IdealSizeMismatch {
                network: network.output_count(),
                data: samples.ideal_size(),
            });
        }
        engine.initialize(&network, &samples)?;
        if config.threads != 0 {
            match engine.threading_mut() {
                Some(control) => control.set_thread_count(config.threads),
                None => return Err(TrainError::ThreadingUnsupported),
            }
        }

        let weight_count = network.weight_count();
        let error = sum_squared_error(&network, &samples);
        Ok(Self {
            network,
            samples,
            engine,
            lambda: config.initial_lambda,
            config,
            weights: Array1::zeros(weight_count),
            diagonal: Array1::zeros(weight_count),
            error,
        })
    }

    /// Network being trained.
    pub fn network(&self) -> &FeedForwardNetwork {
        &self.network
    }

    /// Error reported by the most recent iteration, or the initial SSE
    /// before any iteration has run.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Current damping factor.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Thread count of the Hessian engine.
    ///
    /// Fails with [`TrainError::ThreadingUnsupported`] when the engine
    /// has no threading capability.
    pub fn thread_count(&self) -> Result<usize, TrainError> {
        self.engine
            .threading()
            .map(|control| control.thread_count())
            .ok_or(TrainError::ThreadingUnsupported)
    }

    /// Set the Hessian engine's thread count, passed through unmodified.
    ///
    /// Fails with [`TrainError::ThreadingUnsupported`] when the engine
    /// has no threading capability.
    pub fn set_thread_count(&mut self, threads: usize) -> Result<(), TrainError> {
        match self.engine.threading_mut() {
            Some(control) => {
                control.set_thread_count(threads);
                Ok(())
            }
            None => Err(TrainError::ThreadingUnsupported),
        }
    }

    /// Whether training can be checkpointed and resumed. Always `false`.
    pub fn can_continue(&self) -> bool {
        false
    }

    /// Checkpointing is unsupported; always fails.
    pub fn pause(&mut self) -> Result<TrainingCheckpoint, TrainError> {
        Err(TrainError::CheckpointUnsupported)
    }

    /// Resuming from a checkpoint is unsupported; always fails.
    pub fn resume(&mut self, _checkpoint: TrainingCheckpoint) -> Result<(), TrainError> {
        Err(TrainError::CheckpointUnsupported)
    }

    /// Run one outer training iteration.
    pub fn iteration(&mut self) -> IterationSummary {
        self.engine.clear();
        self.weights = self.network.weights_flat();
        self.engine.compute(&self.network, &self.samples);

        let starting_error = self.engine.sse();
        let mut current_error = starting_error;

        // Undamped baseline; every retry below re-damps from here.
        {
            let hessian = self.engine.hessian();
            for i in 0..self.diagonal.len() {
                self.diagonal[i] = hessian[[i, i]];
            }
        }

        let mut retries = 0;
        let outcome = loop {
            apply_damping(self.engine.hessian_mut(), &self.diagonal, self.lambda);

            let step = LuDecomposition::new(self.engine.hessian()).solve(self.engine.gradient());
            let improved = match step {
                Some(delta) => {
                    let candidate = &self.weights + &delta;
                    self.network.set_weights(&candidate);
                    current_error = sum_squared_error(&self.network, &self.samples);
                    current_error < starting_error
                }
                None => false,
            };

            if improved {
                self.lambda /= self.config.scale_lambda;
                break IterationOutcome::Accepted;
            }

            retries += 1;
            self.lambda *= self.config.scale_lambda;
            if self.lambda > self.config.lambda_max {
                self.lambda = self.config.lambda_max;
                break IterationOutcome::LambdaCeiling;
            }
        };

        self.error = current_error;
        IterationSummary {
            error: current_error,
            lambda: self.lambda,
            retries,
            outcome,
        }
    }
}

/// Damp the Hessian diagonal in place from the cached undamped baseline.
fn apply_damping(hessian: &mut Array2<f64>, diagonal: &Array1<f64>, lambda: f64) {
    for (i, &base) in diagonal.iter().enumerate() {
        hessian[[i, i]] = base + lambda;
    }
}
