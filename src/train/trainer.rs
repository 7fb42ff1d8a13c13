use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::test_set::TestSet;
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::convergence::ErrorSummary;
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn::{run_one_epoch, AttemptState};
use crate::train::state::NetworkState;
use crate::train::train_config::{TrainerOptions, TrainingMode};

/// Result of a converged training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub network: Network,
    /// Average error after each epoch of the attempt that converged.
    pub error_history: Vec<f64>,
    /// Attempts used, counting the successful one.
    pub attempts: usize,
    /// Epochs run by the successful attempt.
    pub epochs: usize,
    pub final_error: ErrorSummary,
    /// Mini-batches dropped by the failure policy over the whole run.
    pub skipped_batches: usize,
}

/// Gradient-descent trainer with momentum and restart-on-divergence.
///
/// Works on a private copy of the network passed to `new`; the caller's
/// network is never touched. Each attempt runs up to `epochs_per_attempt`
/// epochs and stops as soon as both error bounds hold. An attempt that runs
/// out of epochs is discarded and training restarts from freshly initialized
/// parameters of the same topology.
pub struct Trainer {
    attempt: AttemptState,
    test_set: TestSet,
    options: TrainerOptions,
    mode: TrainingMode,
    sgd: Sgd,
    rng: StdRng,
    error_history: Vec<f64>,
    skipped_batches: usize,
    progress_tx: Option<mpsc::Sender<EpochStats>>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl Trainer {
    pub fn new(network: &Network, test_set: TestSet, options: TrainerOptions, mode: TrainingMode) -> Result<Trainer> {
        options.validate()?;
        if mode == TrainingMode::MiniBatch && options.batch_size.is_none() {
            return Err(NetError::InvalidOptions(
                "mini-batch training needs a batch_size".to_string(),
            ));
        }
        network.validate()?;
        test_set.check_shapes(network.input_size, network.output_size)?;

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Trainer {
            attempt: AttemptState::start(NetworkState::initial(network.clone())),
            test_set,
            sgd: Sgd::new(options.learn_rate, options.momentum_coefficient),
            options,
            mode,
            rng,
            error_history: Vec::new(),
            skipped_batches: 0,
            progress_tx: None,
            stop_flag: None,
        })
    }

    /// Sends one `EpochStats` per epoch. Dropping the receiver cancels training.
    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Training stops with `NetError::Cancelled` at the next epoch boundary
    /// after the flag is set.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// The trainer's current private network.
    pub fn network(&self) -> &Network {
        &self.attempt.state.network
    }

    pub fn state(&self) -> &NetworkState {
        &self.attempt.state
    }

    /// Average error per epoch of the current (or last) attempt.
    pub fn error_history(&self) -> &[f64] {
        &self.error_history
    }

    pub fn train(&mut self) -> Result<TrainingReport> {
        loop {
            let attempt = self.attempt.state.attempt;
            info!("training attempt {} ({:?})", attempt, self.mode);

            if let Some((epochs, summary)) = self.run_attempt()? {
                info!(
                    "converged on attempt {} after {} epochs: average {:.6}, max {:.6}",
                    attempt, epochs, summary.average, summary.max
                );
                return Ok(TrainingReport {
                    network: self.attempt.state.network.clone(),
                    error_history: self.error_history.clone(),
                    attempts: attempt,
                    epochs,
                    final_error: summary,
                    skipped_batches: self.skipped_batches,
                });
            }

            if let Some(max) = self.options.max_attempts {
                if attempt >= max {
                    warn!("giving up after {} attempts", attempt);
                    return Err(NetError::AttemptsExhausted { attempts: attempt });
                }
            }

            info!(
                "attempt {} did not converge in {} epochs, restarting",
                attempt, self.options.epochs_per_attempt
            );
            let fresh = self.attempt.state.network.reinitialized(&mut self.rng);
            self.attempt = AttemptState::start(self.attempt.state.restart(fresh));
        }
    }

    /// Runs one attempt from the current state. Returns the epoch count and
    /// final error if it converged.
    fn run_attempt(&mut self) -> Result<Option<(usize, ErrorSummary)>> {
        self.error_history.clear();

        for epoch in 1..=self.options.epochs_per_attempt {
            self.check_stop()?;
            let t_start = Instant::now();

            let skipped = run_one_epoch(
                &mut self.attempt,
                &mut self.test_set,
                &self.sgd,
                &self.options,
                self.mode,
            )?;
            self.skipped_batches += skipped;

            let summary = ErrorSummary::evaluate(&self.attempt.state.network, self.test_set.examples())?;
            self.error_history.push(summary.average);
            debug!(
                "attempt {} epoch {}: average {:.6}, max {:.6}",
                self.attempt.state.attempt, epoch, summary.average, summary.max
            );

            self.emit(EpochStats {
                attempt: self.attempt.state.attempt,
                epoch,
                epochs_per_attempt: self.options.epochs_per_attempt,
                average_error: summary.average,
                max_error: summary.max,
                skipped_batches: skipped,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            })?;

            if summary.is_acceptable(&self.options) {
                return Ok(Some((epoch, summary)));
            }
        }

        Ok(None)
    }

    fn check_stop(&self) -> Result<()> {
        if let Some(ref flag) = self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return Err(NetError::Cancelled);
            }
        }
        Ok(())
    }

    fn emit(&self, stats: EpochStats) -> Result<()> {
        if let Some(ref tx) = self.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                return Err(NetError::Cancelled);
            }
        }
        Ok(())
    }
}

/// Trains a private copy of `network` on `test_set` until it converges.
pub fn train_network(
    network: &Network,
    test_set: TestSet,
    options: TrainerOptions,
    mode: TrainingMode,
) -> Result<TrainingReport> {
    Trainer::new(network, test_set, options, mode)?.train()
}
