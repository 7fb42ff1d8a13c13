//! Trains a digit classifier on a CSV file of `label,p1,...,pk` rows.
//!
//! Usage: `cargo run --release --example digits -- <train.csv> [options.json]`
use std::sync::mpsc;
use std::thread;

use jacobian_nn::data::csv::{load_digits, DIGIT_CLASSES};
use jacobian_nn::train::EpochStats;
use jacobian_nn::{NetError, Network, TestSet, Trainer, TrainerOptions, TrainingMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> jacobian_nn::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: digits <train.csv> [options.json]");
            std::process::exit(2);
        }
    };
    let options = match args.next() {
        Some(options_path) => TrainerOptions::load_json(&options_path)?,
        None => TrainerOptions::new(0.1, 0.5, 30, 0.05, 1.0)
            .with_batch_size(32)
            .with_max_attempts(1)
            .with_seed(3),
    };

    let examples = load_digits(&path)?;
    let pixels = match examples.first() {
        Some(example) => example.input.len(),
        None => return Err(NetError::EmptyTestSet),
    };
    println!("Loaded {} examples of {} pixels", examples.len(), pixels);

    let network = Network::new(pixels, DIGIT_CLASSES, &[32], &mut StdRng::seed_from_u64(3))?;
    let test_set = TestSet::new(examples.clone(), options.seed)?;

    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = thread::spawn(move || {
        for stats in rx {
            println!(
                "attempt {} epoch {}/{}: avg {:.4} max {:.4} ({} ms)",
                stats.attempt, stats.epoch, stats.epochs_per_attempt, stats.average_error, stats.max_error, stats.elapsed_ms
            );
        }
    });

    let result = Trainer::new(&network, test_set, options, TrainingMode::MiniBatch)?
        .with_progress(tx)
        .train();
    let _ = printer.join();
    let report = result?;

    let correct = examples
        .iter()
        .filter(|example| {
            let output = match report.network.forward(&example.input) {
                Ok(output) => output,
                Err(_) => return false,
            };
            argmax(&output) == argmax(&example.correct_output)
        })
        .count();
    println!("Training accuracy: {:.2}%", 100.0 * correct as f64 / examples.len() as f64);
    Ok(())
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}
