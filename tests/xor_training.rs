//! End-to-end training through the public API.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use marquardt_core::{
    train, xor_dataset, Activation, ChainRuleHessian, FeedForwardNetwork, MarquardtConfig,
    MarquardtTrainer, SessionConfig, TrainingLogger,
};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn xor_training_reduces_error_and_logs_jsonl() {
    let network = FeedForwardNetwork::from_seed(
        7,
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
    let initial_error = trainer.error();

    let buffer = SharedBuffer::default();
    let mut logger = TrainingLogger::new(buffer.clone());
    let config = SessionConfig {
        max_iterations: 25,
        target_error: 1e-6,
    };
    let report = train(&mut trainer, &config, Some(&mut logger)).unwrap();

    assert!(report.final_error.is_finite());
    assert!(report.final_error < initial_error);
    assert_eq!(report.final_error, trainer.error());

    let contents = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), report.iterations);
    for (index, line) in lines.iter().enumerate() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(record["iteration"], index + 1);
        assert!(record["error"].as_f64().unwrap().is_finite());
        assert!(record["lambda"].as_f64().unwrap() > 0.0);
    }
}

#[test]
fn finite_difference_engine_trains_the_same_problem() {
    use marquardt_core::FiniteDifferenceHessian;

    let network = FeedForwardNetwork::from_seed(
        7,
        &[2, 3, 1],
        Activation::Sigmoid,
        Activation::Sigmoid,
    );
    let mut trainer = MarquardtTrainer::new(
        network,
        xor_dataset(),
        Box::new(FiniteDifferenceHessian::new()),
        MarquardtConfig::default(),
    )
    .unwrap();
    let initial_error = trainer.error();

    for _ in 0..5 {
        trainer.iteration();
    }
    assert!(trainer.error().is_finite());
    assert!(trainer.error() < initial_error);
}
