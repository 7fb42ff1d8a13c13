use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// How the trainer turns gradients into updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// One update per example.
    Online,
    /// One update per pass, from the gradient averaged over the whole set.
    Offline,
    /// One update per fixed-size batch; each batch is split across workers.
    MiniBatch,
}

/// What the mini-batch trainer does when a batch cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Log the failure, drop that batch's update and continue with the next
    /// batch. The dropped examples contribute nothing to this epoch.
    #[default]
    Skip,
    /// Stop training and return the error.
    Abort,
}

fn default_worker_count() -> usize {
    8
}

fn default_repeats() -> usize {
    1
}

/// Hyperparameters of a training run.
///
/// Stored and loaded as JSON; optional fields fall back to their defaults
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerOptions {
    pub learn_rate: f64,
    pub momentum_coefficient: f64,
    /// Epochs before an unconverged attempt restarts from fresh parameters.
    pub epochs_per_attempt: usize,
    /// Upper bound on the mean per-example squared error.
    pub max_acceptable_average_error: f64,
    /// Upper bound on the worst per-example squared error.
    pub max_acceptable_max_error: f64,
    /// Examples per update; required by `TrainingMode::MiniBatch`.
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// `None` restarts until convergence.
    #[serde(default)]
    pub max_attempts: Option<usize>,
    /// Consecutive online updates applied to each example.
    #[serde(default = "default_repeats")]
    pub repeats_per_example: usize,
    #[serde(default)]
    pub batch_failure_policy: BatchFailurePolicy,
    /// Seeds parameter initialization; `None` draws from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TrainerOptions {
    pub fn new(
        learn_rate: f64,
        momentum_coefficient: f64,
        epochs_per_attempt: usize,
        max_acceptable_average_error: f64,
        max_acceptable_max_error: f64,
    ) -> TrainerOptions {
        TrainerOptions {
            learn_rate,
            momentum_coefficient,
            epochs_per_attempt,
            max_acceptable_average_error,
            max_acceptable_max_error,
            batch_size: None,
            worker_count: default_worker_count(),
            max_attempts: None,
            repeats_per_example: default_repeats(),
            batch_failure_policy: BatchFailurePolicy::default(),
            seed: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_repeats_per_example(mut self, repeats: usize) -> Self {
        self.repeats_per_example = repeats;
        self
    }

    pub fn with_batch_failure_policy(mut self, policy: BatchFailurePolicy) -> Self {
        self.batch_failure_policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(NetError::InvalidOptions(msg.to_string()));

        if !self.learn_rate.is_finite() || self.learn_rate <= 0.0 {
            return invalid("learn_rate must be a positive finite number");
        }
        if !self.momentum_coefficient.is_finite() || self.momentum_coefficient < 0.0 {
            return invalid("momentum_coefficient must be a non-negative finite number");
        }
        if self.epochs_per_attempt == 0 {
            return invalid("epochs_per_attempt must be at least 1");
        }
        if self.max_acceptable_average_error.is_nan() || self.max_acceptable_average_error < 0.0 {
            return invalid("max_acceptable_average_error must be non-negative");
        }
        if self.max_acceptable_max_error.is_nan() || self.max_acceptable_max_error < 0.0 {
            return invalid("max_acceptable_max_error must be non-negative");
        }
        if self.batch_size == Some(0) {
            return invalid("batch_size must be at least 1");
        }
        if self.worker_count == 0 {
            return invalid("worker_count must be at least 1");
        }
        if self.max_attempts == Some(0) {
            return invalid("max_attempts must be at least 1");
        }
        if self.repeats_per_example == 0 {
            return invalid("repeats_per_example must be at least 1");
        }
        Ok(())
    }

    /// Serializes the options to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads options from a JSON file and validates them.
    pub fn load_json(path: &str) -> Result<TrainerOptions> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let options: TrainerOptions = serde_json::from_reader(reader)?;
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let json = r#"{
            "learn_rate": 0.1,
            "momentum_coefficient": 0.1,
            "epochs_per_attempt": 100,
            "max_acceptable_average_error": 0.1,
            "max_acceptable_max_error": 10.0
        }"#;
        let options: TrainerOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options, TrainerOptions::new(0.1, 0.1, 100, 0.1, 10.0));
        assert_eq!(options.worker_count, 8);
        assert_eq!(options.batch_failure_policy, BatchFailurePolicy::Skip);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_policy_parses_snake_case() {
        let json = r#"{
            "learn_rate": 0.1,
            "momentum_coefficient": 0.0,
            "epochs_per_attempt": 1,
            "max_acceptable_average_error": 0.1,
            "max_acceptable_max_error": 0.1,
            "batch_size": 16,
            "batch_failure_policy": "abort",
            "seed": 7
        }"#;
        let options: TrainerOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.batch_failure_policy, BatchFailurePolicy::Abort);
        assert_eq!(options.batch_size, Some(16));
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = TrainerOptions::new(0.1, 0.1, 10, 0.1, 0.1);
        assert!(TrainerOptions { learn_rate: 0.0, ..base.clone() }.validate().is_err());
        assert!(TrainerOptions { learn_rate: f64::NAN, ..base.clone() }.validate().is_err());
        assert!(TrainerOptions { momentum_coefficient: -0.5, ..base.clone() }.validate().is_err());
        assert!(TrainerOptions { epochs_per_attempt: 0, ..base.clone() }.validate().is_err());
        assert!(base.clone().with_batch_size(0).validate().is_err());
        assert!(base.clone().with_worker_count(0).validate().is_err());
        assert!(base.clone().with_max_attempts(0).validate().is_err());
        assert!(base.clone().with_repeats_per_example(0).validate().is_err());
        assert!(base.validate().is_ok());
    }
}
