use std::io::{self, BufRead};
use std::process;

use log::error;
use rand::rngs::StdRng;
use rand::SeedableRng;

use jacobian_nn::data::generators::all_bitmasks;
use jacobian_nn::{AnswerFunction, Matrix, Network, Result, TestSet, Trainer, TrainerOptions, TrainingMode};

const INPUT_SIZE: usize = 10;
const SEPARATOR: &str = "--------------------------------------";

/// Usage: `jacobian-nn [options.json]`
///
/// Trains a network to count the ones in a 10-bit input, then answers
/// queries read from stdin.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = match std::env::args().nth(1) {
        Some(path) => TrainerOptions::load_json(&path)?,
        None => TrainerOptions::new(0.1, 0.1, 10000, 0.1, 10.0),
    };

    let answer = AnswerFunction::OneQuantity;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let network = Network::new(INPUT_SIZE, answer.output_size(INPUT_SIZE), &[10, 10], &mut rng)?;
    let test_set = TestSet::new(all_bitmasks(INPUT_SIZE, answer), options.seed)?;

    let report = Trainer::new(&network, test_set, options, TrainingMode::Online)?.train()?;
    let network = report.network;

    for weights in network.weights() {
        println!("{}\n", weights);
    }
    for biases in network.biases() {
        println!("{}\n", biases);
    }
    println!("{:?}", report.error_history);
    println!("{}", SEPARATOR);

    let stdin = io::stdin();
    let mut tokens = stdin
        .lock()
        .lines()
        .map_while(|line| line.ok())
        .flat_map(|line| line.split_whitespace().map(str::to_owned).collect::<Vec<_>>());

    loop {
        let input: Option<Vec<f64>> = (0..INPUT_SIZE)
            .map(|_| tokens.next().and_then(|t| t.parse().ok()))
            .collect();
        let input = match input {
            Some(input) => input,
            None => {
                println!("\n{}", SEPARATOR);
                break;
            }
        };

        let output = network.forward(&input)?;
        let rounded: Vec<f64> = output.iter().map(|x| x.round()).collect();
        let correct = answer.apply(&input);

        println!();
        println!("Precise output: {:?}", output);
        println!("Simplified output: {}", Matrix::new(1, rounded.len(), &rounded)?);
        println!("Correct output: {}", Matrix::new(1, correct.len(), &correct)?);
        println!("{}", SEPARATOR);
    }

    Ok(())
}
