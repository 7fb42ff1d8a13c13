//! Counts the ones in a 6-bit input with mini-batch training, holding out
//! a few patterns to see how the network generalizes.
use jacobian_nn::data::generators::all_bitmasks_except;
use jacobian_nn::{train_network, AnswerFunction, NetworkSpec, TestSet, TrainerOptions, TrainingMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

const BITS: usize = 6;

fn main() -> jacobian_nn::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let answer = AnswerFunction::OneQuantity;
    let held_out = vec![
        vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0],
    ];

    let spec = NetworkSpec::new(BITS, answer.output_size(BITS), vec![12, 12])?;
    let network = spec.build(&mut StdRng::seed_from_u64(11))?;
    let options = TrainerOptions::new(0.3, 0.3, 3000, 0.05, 0.5)
        .with_batch_size(8)
        .with_worker_count(4)
        .with_max_attempts(5)
        .with_seed(11);
    let test_set = TestSet::new(all_bitmasks_except(BITS, answer, &held_out), options.seed)?;

    let report = train_network(&network, test_set, options, TrainingMode::MiniBatch)?;
    println!(
        "Converged after {} attempt(s), {} epochs (skipped batches: {})",
        report.attempts, report.epochs, report.skipped_batches
    );

    for input in &held_out {
        let output = report.network.forward(input)?;
        let guess = output
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0;
        let ones = input.iter().filter(|&&x| x == 1.0).count();
        println!("{:?}: predicted {} ones, actual {}", input, guess, ones);
    }
    Ok(())
}
