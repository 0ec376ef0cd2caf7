//! Sum-squared-error evaluation over a full training set.

use crate::data::TrainingSet;
use crate::network::FeedForwardNetwork;

/// Significance-weighted SSE of the network over every sample.
///
/// Uses the same error definition as the Hessian engines, so the trainer
/// can compare the two values directly when deciding acceptance.
pub fn sum_squared_error(network: &FeedForwardNetwork, samples: &TrainingSet) -> f64 {
    let mut sse = 0.0;
    for k in 0..samples.len() {
        let output = network.forward(samples.input(k));
        let ideal = samples.ideal(k);
        let significance = samples.significance(k);
        for (predicted, target) in output.iter().zip(ideal.iter()) {
            let error = target - predicted;
            sse += significance * error * error;
        }
    }
    sse
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::linear_dataset;
    use crate::network::Activation;
    use ndarray::array;

    #[test]
    fn exact_network_scores_zero() {
        let mut network =
            FeedForwardNetwork::new(&[1, 1], Activation::Linear, Activation::Linear);
        // y = 2x + 1, matching the dataset exactly.
        network.set_weights(&array![2.0, 1.0]);
        let samples = linear_dataset(5, 2.0, 1.0);
        assert!(sum_squared_error(&network, &samples) < 1e-24);
    }

    #[test]
    fn significance_scales_each_sample() {
        use crate::data::TrainingSet;

        // Zero network predicts 0.0 everywhere; each sample misses by 1.0.
        let network = FeedForwardNetwork::new(&[1, 1], Activation::Linear, Activation::Linear);
        let samples = TrainingSet::with_significance(
            array![[0.0], [0.0]],
            array![[1.0], [1.0]],
            array![1.0, 2.0],
        )
        .unwrap();
        assert!((sum_squared_error(&network, &samples) - 3.0).abs() < 1e-12);
    }
}
