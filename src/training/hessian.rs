//! Hessian engines: curvature, gradient, and SSE for the trainer.
//!
//! [`HessianSource`] is the contract the trainer drives once per outer
//! iteration. [`ChainRuleHessian`] backpropagates analytic Jacobian rows
//! and accumulates sample blocks in parallel; [`FiniteDifferenceHessian`]
//! is the slow numerical reference engine and deliberately exposes no
//! threading capability.

use std::cell::RefCell;

use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::data::TrainingSet;
use crate::network::{FeedForwardNetwork, ForwardTrace};
use crate::training::TrainError;

/// Thread-count control for engines that parallelize `compute`.
pub trait ThreadControl {
    /// Current worker-block count; 0 means one block per available core.
    fn thread_count(&self) -> usize;
    /// Worker-block count for subsequent `compute` calls.
    fn set_thread_count(&mut self, threads: usize);
}

/// Second-order error information at the network's current weights.
///
/// One `compute` per outer iteration fills a symmetric Hessian
/// approximation, a gradient vector, and the SSE at the undamped weights:
///
/// ```text
/// hessian[i][j] = Σ_k s_k (∂y_k/∂w_i)(∂y_k/∂w_j)
/// gradient[j]   = Σ_k s_k e_k ∂y_k/∂w_j        with e_k = ideal_k − y_k
/// sse           = Σ_k s_k e_k²
/// ```
///
/// so the update solved from `(H + λI) Δ = g` is applied as `w + Δ`. The
/// trainer overwrites diagonal entries through `hessian_mut` while
/// damping; `clear` followed by `compute` rebuilds everything.
pub trait HessianSource {
    /// Validate shapes and allocate buffers. Called once at trainer
    /// construction; engines that only handle single-output networks
    /// reject anything else here.
    fn initialize(
        &mut self,
        network: &FeedForwardNetwork,
        samples: &TrainingSet,
    ) -> Result<(), TrainError>;

    /// Reset accumulated state before a fresh computation.
    fn clear(&mut self);

    /// Full pass over the training set at the network's current weights.
    fn compute(&mut self, network: &FeedForwardNetwork, samples: &TrainingSet);

    fn hessian(&self) -> &Array2<f64>;

    fn hessian_mut(&mut self) -> &mut Array2<f64>;

    fn gradient(&self) -> &Array1<f64>;

    fn sse(&self) -> f64;

    /// Threading capability, if this engine has one.
    fn threading(&self) -> Option<&dyn ThreadControl> {
        None
    }

    /// Mutable threading capability, if this engine has one.
    fn threading_mut(&mut self) -> Option<&mut dyn ThreadControl> {
        None
    }
}

/// Running upper-triangle sums for one block of samples.
struct Accumulator {
    hessian: Array2<f64>,
    gradient: Array1<f64>,
    sse: f64,
}

impl Accumulator {
    fn new(weight_count: usize) -> Self {
        Self {
            hessian: Array2::zeros((weight_count, weight_count)),
            gradient: Array1::zeros(weight_count),
            sse: 0.0,
        }
    }

    /// Fold one sample's Jacobian row into the running sums.
    fn absorb(&mut self, significance: f64, error: f64, jacobian: &Array1<f64>) {
        let n = jacobian.len();
        self.sse += significance * error * error;
        for i in 0..n {
            let ji = jacobian[i];
            self.gradient[i] += significance * error * ji;
            for j in i..n {
                self.hessian[[i, j]] += significance * ji * jacobian[j];
            }
        }
    }

    fn merge(&mut self, other: Accumulator) {
        self.hessian += &other.hessian;
        self.gradient += &other.gradient;
        self.sse += other.sse;
    }

    /// Copy the accumulated upper triangle onto the lower.
    fn mirror(&mut self) {
        let n = self.gradient.len();
        for i in 0..n {
            for j in (i + 1)..n {
                self.hessian[[j, i]] = self.hessian[[i, j]];
            }
        }
    }
}

/// Analytic engine: per-sample Jacobian rows by backpropagation.
///
/// Samples are split into contiguous blocks accumulated in parallel and
/// merged on the calling thread. Only single-output networks are
/// supported; `initialize` rejects anything else.
pub struct ChainRuleHessian {
    hessian: Array2<f64>,
    gradient: Array1<f64>,
    sse: f64,
    threads: usize,
}

impl ChainRuleHessian {
    pub fn new() -> Self {
        Self {
            hessian: Array2::zeros((0, 0)),
            gradient: Array1::zeros(0),
            sse: 0.0,
            threads: 0,
        }
    }

    fn block_count(&self, samples: usize) -> usize {
        let requested = if self.threads == 0 {
            rayon::current_num_threads()
        } else {
            self.threads
        };
        requested.max(1).min(samples.max(1))
    }
}

impl Default for ChainRuleHessian {
    fn default() -> Self {
        Self::new()
    }
}

impl HessianSource for ChainRuleHessian {
    fn initialize(
        &mut self,
        network: &FeedForwardNetwork,
        _samples: &TrainingSet,
    ) -> Result<(), TrainError> {
        if network.output_count() != 1 {
            return Err(TrainError::UnsupportedOutputCount {
                outputs: network.output_count(),
            });
        }
        let n = network.weight_count();
        self.hessian = Array2::zeros((n, n));
        self.gradient = Array1::zeros(n);
        self.sse = 0.0;
        Ok(())
    }

    fn clear(&mut self) {
        self.hessian.fill(0.0);
        self.gradient.fill(0.0);
        self.sse = 0.0;
    }

    fn compute(&mut self, network: &FeedForwardNetwork, samples: &TrainingSet) {
        let weight_count = network.weight_count();
        let blocks = split_blocks(samples.len(), self.block_count(samples.len()));

        let mut merged = blocks
            .into_par_iter()
            .map(|(start, end)| {
                let mut accumulator = Accumulator::new(weight_count);
                let mut jacobian = Array1::zeros(weight_count);
                for k in start..end {
                    let trace = network.forward_trace(samples.input(k));
                    let error = samples.ideal(k)[0] - trace.output()[0];
                    output_jacobian(network, &trace, &mut jacobian);
                    accumulator.absorb(samples.significance(k), error, &jacobian);
                }
                accumulator
            })
            .reduce(
                || Accumulator::new(weight_count),
                |mut left, right| {
                    left.merge(right);
                    left
                },
            );

        merged.mirror();
        self.hessian = merged.hessian;
        self.gradient = merged.gradient;
        self.sse = merged.sse;
    }

    fn hessian(&self) -> &Array2<f64> {
        &self.hessian
    }

    fn hessian_mut(&mut self) -> &mut Array2<f64> {
        &mut self.hessian
    }

    fn gradient(&self) -> &Array1<f64> {
        &self.gradient
    }

    fn sse(&self) -> f64 {
        self.sse
    }

    fn threading(&self) -> Option<&dyn ThreadControl> {
        Some(self)
    }

    fn threading_mut(&mut self) -> Option<&mut dyn ThreadControl> {
        Some(self)
    }
}

impl ThreadControl for ChainRuleHessian {
    fn thread_count(&self) -> usize {
        self.threads
    }

    fn set_thread_count(&mut self, threads: usize) {
        self.threads = threads;
    }
}

/// Numerical reference engine: Jacobian rows by central differences.
///
/// Evaluates a probe copy of the network with perturbed weights through
/// the `finitediff` crate. Strictly single-threaded and without a
/// threading capability, so thread-count requests against it fail.
pub struct FiniteDifferenceHessian {
    hessian: Array2<f64>,
    gradient: Array1<f64>,
    sse: f64,
}

impl FiniteDifferenceHessian {
    pub fn new() -> Self {
        Self {
            hessian: Array2::zeros((0, 0)),
            gradient: Array1::zeros(0),
            sse: 0.0,
        }
    }
}

impl Default for FiniteDifferenceHessian {
    fn default() -> Self {
        Self::new()
    }
}

impl HessianSource for FiniteDifferenceHessian {
    fn initialize(
        &mut self,
        network: &FeedForwardNetwork,
        _samples: &TrainingSet,
    ) -> Result<(), TrainError> {
        if network.output_count() != 1 {
            return Err(TrainError::UnsupportedOutputCount {
                outputs: network.output_count(),
            });
        }
        let n = network.weight_count();
        self.hessian = Array2::zeros((n, n));
        self.gradient = Array1::zeros(n);
        self.sse = 0.0;
        Ok(())
    }

    fn clear(&mut self) {
        self.hessian.fill(0.0);
        self.gradient.fill(0.0);
        self.sse = 0.0;
    }

    fn compute(&mut self, network: &FeedForwardNetwork, samples: &TrainingSet) {
        let weight_count = network.weight_count();
        let weights = network.weights_flat();
        let probe = RefCell::new(network.clone());

        let mut accumulator = Accumulator::new(weight_count);
        for k in 0..samples.len() {
            let output = network.forward(samples.input(k))[0];
            let error = samples.ideal(k)[0] - output;
            let jacobian = weights.central_diff(&|w: &Array1<f64>| {
                let mut net = probe.borrow_mut();
                net.set_weights(w);
                net.forward(samples.input(k))[0]
            });
            accumulator.absorb(samples.significance(k), error, &jacobian);
        }

        accumulator.mirror();
        self.hessian = accumulator.hessian;
        self.gradient = accumulator.gradient;
        self.sse = accumulator.sse;
    }

    fn hessian(&self) -> &Array2<f64> {
        &self.hessian
    }

    fn hessian_mut(&mut self) -> &mut Array2<f64> {
        &mut self.hessian
    }

    fn gradient(&self) -> &Array1<f64> {
        &self.gradient
    }

    fn sse(&self) -> f64 {
        self.sse
    }
}

/// Contiguous index ranges covering `0..len` in at most `blocks` pieces.
fn split_blocks(len: usize, blocks: usize) -> Vec<(usize, usize)> {
    let blocks = blocks.max(1);
    let base = len / blocks;
    let extra = len % blocks;
    let mut ranges = Vec::with_capacity(blocks);
    let mut start = 0;
    for block in 0..blocks {
        let size = base + usize::from(block < extra);
        if size == 0 {
            continue;
        }
        ranges.push((start, start + size));
        start += size;
    }
    ranges
}

/// Jacobian row `∂y/∂w` of the single network output, written into `out`
/// in the network's flat parameter order.
fn output_jacobian(network: &FeedForwardNetwork, trace: &ForwardTrace, out: &mut Array1<f64>) {
    let layers = network.layers();
    let last = layers.len() - 1;

    // Flat offset of each layer's parameter block.
    let mut offsets = Vec::with_capacity(layers.len());
    let mut offset = 0;
    for layer in layers {
        offsets.push(offset);
        offset += layer.weights.len() + layer.bias.len();
    }

    let mut delta: Array1<f64> = trace.pre_activations[last]
        .mapv(|z| layers[last].activation.derivative(z));

    for l in (0..=last).rev() {
        let layer = &layers[l];
        let inputs = &trace.activations[l];
        let (rows, cols) = layer.weights.dim();
        let base = offsets[l];
        for i in 0..rows {
            for j in 0..cols {
                out[base + i * cols + j] = delta[i] * inputs[j];
            }
            out[base + rows * cols + i] = delta[i];
        }
        if l > 0 {
            let back = layer.weights.t().dot(&delta);
            delta = back
                .iter()
                .zip(trace.pre_activations[l - 1].iter())
                .map(|(&b, &z)| b * layers[l - 1].activation.derivative(z))
                .collect();
        }
    }
}
