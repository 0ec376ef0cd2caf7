//! Train a small network on XOR and print per-iteration progress.

use marquardt_core::{
    train, xor_dataset, Activation, ChainRuleHessian, FeedForwardNetwork, MarquardtConfig,
    MarquardtTrainer, SessionConfig, TrainingLogger,
};

fn main() {
    let network = FeedForwardNetwork::from_seed(
        42,
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
    .expect("XOR shapes match the network");

    println!("initial SSE: {:.6}", trainer.error());

    let mut logger = TrainingLogger::new(std::io::stdout());
    let config = SessionConfig {
        max_iterations: 50,
        target_error: 1e-3,
    };
    let report = train(&mut trainer, &config, Some(&mut logger)).expect("training run completes");

    println!(
        "iterations: {} | final SSE: {:.6} | reached target: {}",
        report.iterations, report.final_error, report.reached_target
    );

    let samples = xor_dataset();
    for k in 0..samples.len() {
        let output = trainer.network().forward(samples.input(k));
        println!(
            "{:?} -> {:.4} (ideal {})",
            samples.input(k).to_vec(),
            output[0],
            samples.ideal(k)[0]
        );
    }
}
