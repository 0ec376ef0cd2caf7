//! Activation functions for dense layers.

/// Activation applied to a layer's weighted sums.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    /// Value of the activation at pre-activation `z`.
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Activation::Tanh => z.tanh(),
            Activation::Linear => z,
        }
    }

    /// Derivative with respect to the pre-activation, evaluated at `z`.
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let s = 1.0 / (1.0 + (-z).exp());
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            Activation::Linear => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn central_difference(activation: Activation, z: f64) -> f64 {
        let h = 1e-6;
        (activation.apply(z + h) - activation.apply(z - h)) / (2.0 * h)
    }

    #[test]
    fn sigmoid_stays_in_unit_interval() {
        for z in [-20.0, -1.0, 0.0, 1.0, 20.0] {
            let s = Activation::Sigmoid.apply(z);
            assert!(s > 0.0 && s < 1.0);
        }
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn derivatives_match_central_differences() {
        for activation in [Activation::Sigmoid, Activation::Tanh, Activation::Linear] {
            for z in [-2.0, -0.3, 0.0, 0.7, 1.5] {
                let analytic = activation.derivative(z);
                let numeric = central_difference(activation, z);
                assert!(
                    (analytic - numeric).abs() < 1e-8,
                    "{activation:?} derivative at {z}: {analytic} vs {numeric}"
                );
            }
        }
    }
}
