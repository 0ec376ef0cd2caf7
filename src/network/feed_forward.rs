//! Dense feed-forward network with flat parameter marshaling.
//!
//! The trainer never touches layer internals: it exports the parameters as
//! one flat vector, solves for an update, and imports the candidate vector
//! whole. The flat order is fixed: for each layer, the weight matrix in
//! row-major order followed by the biases.

use ndarray::{Array1, Array2, ArrayView1};

use crate::network::activation::Activation;

/// A single dense layer computing `f(W a + b)`.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Weight matrix, `output × input`.
    pub weights: Array2<f64>,
    /// Bias vector, one entry per output neuron.
    pub bias: Array1<f64>,
    /// Activation applied to the weighted sums.
    pub activation: Activation,
}

impl Layer {
    fn new(input: usize, output: usize, activation: Activation) -> Self {
        Self {
            weights: Array2::zeros((output, input)),
            bias: Array1::zeros(output),
            activation,
        }
    }

    fn parameter_count(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}

/// Activations recorded during a forward pass.
///
/// `activations[0]` is the input vector and `activations[l + 1]` the output
/// of layer `l`; `pre_activations[l]` holds layer `l`'s weighted sums before
/// the activation is applied.
#[derive(Clone, Debug)]
pub struct ForwardTrace {
    pub activations: Vec<Array1<f64>>,
    pub pre_activations: Vec<Array1<f64>>,
}

impl ForwardTrace {
    /// Network output for the traced input.
    pub fn output(&self) -> &Array1<f64> {
        self.activations
            .last()
            .expect("trace always holds the input activation")
    }
}

/// Fully connected feed-forward network.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    layers: Vec<Layer>,
    input_count: usize,
}

impl FeedForwardNetwork {
    /// Build a zero-initialized network from layer sizes
    /// `[input, hidden.., output]`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two sizes are given or any size is zero.
    pub fn new(layer_sizes: &[usize], hidden: Activation, output: Activation) -> Self {
        assert!(
            layer_sizes.len() >= 2,
            "network needs at least an input and an output size"
        );
        assert!(
            layer_sizes.iter().all(|&size| size > 0),
            "layer sizes must be nonzero"
        );

        let last = layer_sizes.len() - 2;
        let mut layers = Vec::with_capacity(layer_sizes.len() - 1);
        for (index, pair) in layer_sizes.windows(2).enumerate() {
            let activation = if index == last { output } else { hidden };
            layers.push(Layer::new(pair[0], pair[1], activation));
        }

        Self {
            layers,
            input_count: layer_sizes[0],
        }
    }

    /// Build a network with weights drawn deterministically in `[-1, 1]`.
    pub fn from_seed(
        seed: u64,
        layer_sizes: &[usize],
        hidden: Activation,
        output: Activation,
    ) -> Self {
        let mut network = Self::new(layer_sizes, hidden, output);
        let state = if seed == 0 { 1 } else { seed };

        let mut flat = network.weights_flat();
        for (index, value) in flat.iter_mut().enumerate() {
            let next = lcg(index as u64 + state);
            *value = normalized(next) * 2.0 - 1.0;
        }
        network.set_weights(&flat);
        network
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.layers
            .last()
            .expect("constructor guarantees at least one layer")
            .bias
            .len()
    }

    /// Total number of trainable parameters.
    pub fn weight_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Export all parameters as a flat vector.
    pub fn weights_flat(&self) -> Array1<f64> {
        let mut flat = Array1::zeros(self.weight_count());
        let mut offset = 0;
        for layer in &self.layers {
            for row in layer.weights.rows() {
                for &weight in row.iter() {
                    flat[offset] = weight;
                    offset += 1;
                }
            }
            for &bias in layer.bias.iter() {
                flat[offset] = bias;
                offset += 1;
            }
        }
        flat
    }

    /// Import a flat vector as the current parameters.
    ///
    /// # Panics
    ///
    /// Panics if `flat` does not hold exactly `weight_count` entries.
    pub fn set_weights(&mut self, flat: &Array1<f64>) {
        assert_eq!(
            flat.len(),
            self.weight_count(),
            "parameter vector length must match the network"
        );
        let mut offset = 0;
        for layer in &mut self.layers {
            for mut row in layer.weights.rows_mut() {
                for weight in row.iter_mut() {
                    *weight = flat[offset];
                    offset += 1;
                }
            }
            for bias in layer.bias.iter_mut() {
                *bias = flat[offset];
                offset += 1;
            }
        }
    }

    /// Forward-evaluate one input vector.
    ///
    /// # Panics
    ///
    /// Panics if the input length disagrees with the network.
    pub fn forward(&self, input: ArrayView1<f64>) -> Array1<f64> {
        assert_eq!(
            input.len(),
            self.input_count,
            "input length must match the network"
        );
        let mut activation = input.to_owned();
        for layer in &self.layers {
            let z = layer.weights.dot(&activation) + &layer.bias;
            activation = z.mapv(|value| layer.activation.apply(value));
        }
        activation
    }

    /// Forward pass recording every layer's activations and weighted sums.
    pub fn forward_trace(&self, input: ArrayView1<f64>) -> ForwardTrace {
        assert_eq!(
            input.len(),
            self.input_count,
            "input length must match the network"
        );
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        activations.push(input.to_owned());
        for layer in &self.layers {
            let previous = activations.last().expect("input pushed above");
            let z = layer.weights.dot(previous) + &layer.bias;
            let a = z.mapv(|value| layer.activation.apply(value));
            pre_activations.push(z);
            activations.push(a);
        }
        ForwardTrace {
            activations,
            pre_activations,
        }
    }
}

fn lcg(state: u64) -> u64 {
    state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

fn normalized(value: u64) -> f64 {
    (value >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn weight_count_includes_biases() {
        let network =
            FeedForwardNetwork::new(&[2, 3, 1], Activation::Sigmoid, Activation::Sigmoid);
        // 2*3 weights + 3 biases + 3*1 weights + 1 bias
        assert_eq!(network.weight_count(), 13);
        assert_eq!(network.input_count(), 2);
        assert_eq!(network.output_count(), 1);
    }

    #[test]
    fn weights_roundtrip_through_flat_vector() {
        let mut network =
            FeedForwardNetwork::from_seed(42, &[2, 3, 1], Activation::Tanh, Activation::Linear);
        let exported = network.weights_flat();
        network.set_weights(&Array1::zeros(exported.len()));
        assert!(network.weights_flat().iter().all(|&w| w == 0.0));
        network.set_weights(&exported);
        assert_eq!(network.weights_flat(), exported);
    }

    #[test]
    fn from_seed_is_deterministic() {
        let a = FeedForwardNetwork::from_seed(7, &[2, 4, 1], Activation::Sigmoid, Activation::Sigmoid);
        let b = FeedForwardNetwork::from_seed(7, &[2, 4, 1], Activation::Sigmoid, Activation::Sigmoid);
        let c = FeedForwardNetwork::from_seed(8, &[2, 4, 1], Activation::Sigmoid, Activation::Sigmoid);
        assert_eq!(a.weights_flat(), b.weights_flat());
        assert_ne!(a.weights_flat(), c.weights_flat());
        assert!(a.weights_flat().iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn forward_computes_linear_layer_exactly() {
        let mut network = FeedForwardNetwork::new(&[2, 1], Activation::Linear, Activation::Linear);
        // w = [2, -1], b = [0.5]
        network.set_weights(&array![2.0, -1.0, 0.5]);
        let output = network.forward(array![3.0, 4.0].view());
        assert!((output[0] - (2.0 * 3.0 - 4.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn forward_trace_output_matches_forward() {
        let network =
            FeedForwardNetwork::from_seed(3, &[2, 3, 1], Activation::Sigmoid, Activation::Sigmoid);
        let input = array![0.25, 0.75];
        let direct = network.forward(input.view());
        let trace = network.forward_trace(input.view());
        assert_eq!(trace.output(), &direct);
        assert_eq!(trace.activations.len(), 3);
        assert_eq!(trace.pre_activations.len(), 2);
    }
}
