//! Outer training driver: iterate until a target error or a cap.

use serde::Serialize;

use crate::config::SessionConfig;
use crate::logging::TrainingLogger;
use crate::training::marquardt::MarquardtTrainer;
use crate::training::TrainError;

/// Result of a completed training run.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TrainingReport {
    /// Iterations actually executed.
    pub iterations: usize,
    /// Error reported by the last iteration.
    pub final_error: f64,
    /// Whether the target error was reached before the iteration cap.
    pub reached_target: bool,
}

/// Run trainer iterations until the error target or the iteration cap,
/// optionally logging one JSON line per iteration.
pub fn train(
    trainer: &mut MarquardtTrainer,
    config: &SessionConfig,
    mut logger: Option<&mut TrainingLogger>,
) -> Result<TrainingReport, TrainError> {
    let mut iterations = 0;
    let mut final_error = trainer.error();

    while iterations < config.max_iterations {
        let summary = trainer.iteration();
        iterations += 1;
        final_error = summary.error;

        if let Some(logger) = logger.as_deref_mut() {
            logger.log(iterations, &summary)?;
        }
        if summary.error <= config.target_error {
            return Ok(TrainingReport {
                iterations,
                final_error,
                reached_target: true,
            });
        }
    }

    Ok(TrainingReport {
        iterations,
        final_error,
        reached_target: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarquardtConfig;
    use crate::data::{linear_dataset, xor_dataset};
    use crate::network::{Activation, FeedForwardNetwork};
    use crate::training::hessian::ChainRuleHessian;

    #[test]
    fn stops_once_the_target_error_is_reached() {
        let network = FeedForwardNetwork::new(&[1, 1], Activation::Linear, Activation::Linear);
        let mut trainer = MarquardtTrainer::new(
            network,
            linear_dataset(5, 2.0, 1.0),
            Box::new(ChainRuleHessian::new()),
            MarquardtConfig::default(),
        )
        .unwrap();

        let config = SessionConfig {
            max_iterations: 50,
            target_error: 1e-6,
        };
        let report = train(&mut trainer, &config, None).unwrap();
        assert!(report.reached_target);
        assert!(report.iterations < 50);
        assert!(report.final_error <= 1e-6);
    }

    #[test]
    fn respects_the_iteration_cap() {
        let network = FeedForwardNetwork::from_seed(
            9,
            &[2, 4, 1],
            Activation::Sigmoid,
            Activation::Sigmoid,
        );
        let mut trainer = MarquardtTrainer::new(
            network,
            xor_dataset(),
            Box::new(ChainRuleHessian::new()),
            MarquardtConfig::default(),
        )
        .unwrap();

        let config = SessionConfig {
            max_iterations: 3,
            target_error: 0.0,
        };
        let report = train(&mut trainer, &config, None).unwrap();
        assert_eq!(report.iterations, 3);
        assert!(!report.reached_target);
        assert!(report.final_error.is_finite());
    }
}
