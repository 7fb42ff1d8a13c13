use log::{trace, warn};

use crate::data::example::LabeledExample;
use crate::data::test_set::TestSet;
use crate::error::Result;
use crate::grad::engine::NetworkGradient;
use crate::optim::increment::ParameterIncrement;
use crate::optim::sgd::Sgd;
use crate::train::state::NetworkState;
use crate::train::train_config::{BatchFailurePolicy, TrainerOptions, TrainingMode};
use crate::train::workers::batch_gradient;

/// Mutable state of one training attempt, threaded through every epoch.
pub(crate) struct AttemptState {
    pub state: NetworkState,
    pub increments: ParameterIncrement,
}

impl AttemptState {
    /// Fresh attempt: zero momentum.
    pub fn start(state: NetworkState) -> AttemptState {
        let increments = ParameterIncrement::zeros_for(&state.network);
        AttemptState { state, increments }
    }

    /// Applies one update and records its increment for the next momentum term.
    fn apply(&mut self, sgd: &Sgd, gradient: &NetworkGradient) -> Result<()> {
        let (network, increment) = sgd.step(&self.state.network, gradient, &self.increments)?;
        self.state = self.state.advance(network);
        self.increments = increment;
        Ok(())
    }
}

/// Runs one pass over `test_set` with the policy of `mode`.
/// Returns the number of mini-batches dropped by the failure policy.
pub(crate) fn run_one_epoch(
    attempt: &mut AttemptState,
    test_set: &mut TestSet,
    sgd: &Sgd,
    options: &TrainerOptions,
    mode: TrainingMode,
) -> Result<usize> {
    test_set.clear_tests_queue();

    match mode {
        TrainingMode::Online => {
            online_epoch(attempt, test_set, sgd, options.repeats_per_example)?;
            Ok(0)
        }
        TrainingMode::Offline => {
            offline_epoch(attempt, test_set, sgd)?;
            Ok(0)
        }
        TrainingMode::MiniBatch => {
            // Trainer::new refuses MiniBatch without a batch size.
            let batch_size = options.batch_size.unwrap_or(test_set.size());
            mini_batch_epoch(
                attempt,
                test_set,
                sgd,
                batch_size,
                options.worker_count,
                options.batch_failure_policy,
            )
        }
    }
}

fn online_epoch(attempt: &mut AttemptState, test_set: &mut TestSet, sgd: &Sgd, repeats: usize) -> Result<()> {
    while let Some(example) = test_set.next_test() {
        for _ in 0..repeats {
            let gradient = NetworkGradient::compute(&attempt.state.network, example)?;
            attempt.apply(sgd, &gradient)?;
        }
    }
    Ok(())
}

fn offline_epoch(attempt: &mut AttemptState, test_set: &mut TestSet, sgd: &Sgd) -> Result<()> {
    let size = test_set.size();
    let examples = match test_set.next_batch(size) {
        Some(examples) => examples,
        None => return Ok(()),
    };

    if let Some(total) = NetworkGradient::sum_over(&attempt.state.network, examples)? {
        attempt.apply(sgd, &total.scaled(1.0 / examples.len() as f64))?;
    }
    Ok(())
}

fn mini_batch_epoch(
    attempt: &mut AttemptState,
    test_set: &mut TestSet,
    sgd: &Sgd,
    batch_size: usize,
    worker_count: usize,
    policy: BatchFailurePolicy,
) -> Result<usize> {
    let mut skipped = 0;
    let mut batch_index = 0;

    while let Some(batch) = test_set.next_batch(batch_size) {
        match train_batch(attempt, batch, sgd, worker_count) {
            Ok(()) => trace!("batch {} applied ({} examples)", batch_index, batch.len()),
            Err(e) => match policy {
                BatchFailurePolicy::Skip => {
                    warn!("skipping batch {} ({} examples): {}", batch_index, batch.len(), e);
                    skipped += 1;
                }
                BatchFailurePolicy::Abort => return Err(e),
            },
        }
        batch_index += 1;
    }

    Ok(skipped)
}

fn train_batch(
    attempt: &mut AttemptState,
    batch: &[LabeledExample],
    sgd: &Sgd,
    worker_count: usize,
) -> Result<()> {
    if let Some(total) = batch_gradient(&attempt.state.network, batch, worker_count)? {
        attempt.apply(sgd, &total.scaled(1.0 / batch.len() as f64))?;
    }
    Ok(())
}
