use jacobian_nn::{train_network, LabeledExample, Network, TestSet, TrainerOptions, TrainingMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> jacobian_nn::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let examples = vec![
        LabeledExample::new(vec![1.0, 0.0], vec![1.0]),
        LabeledExample::new(vec![1.0, 1.0], vec![0.0]),
        LabeledExample::new(vec![0.0, 1.0], vec![1.0]),
        LabeledExample::new(vec![0.0, 0.0], vec![0.0]),
    ];

    let network = Network::new(2, 1, &[3], &mut StdRng::seed_from_u64(7))?;
    let options = TrainerOptions::new(0.5, 0.5, 5000, 0.01, 0.05).with_seed(7);
    let test_set = TestSet::new(examples.clone(), options.seed)?;

    let report = train_network(&network, test_set, options, TrainingMode::Online)?;
    println!(
        "Converged after {} attempt(s), {} epochs: average error {:.6}",
        report.attempts, report.epochs, report.final_error.average
    );

    for example in &examples {
        let output = report.network.forward(&example.input)?;
        println!("Input: {:?} -> Output: {:.4}", example.input, output[0]);
    }
    Ok(())
}
