use serde::{Deserialize, Serialize};

/// Per-epoch training statistics.
///
/// When a progress channel is attached to the `Trainer`, one `EpochStats`
/// value is sent at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based attempt number; grows on every restart.
    pub attempt: usize,
    /// 1-based epoch number within the attempt.
    pub epoch: usize,
    pub epochs_per_attempt: usize,
    /// Mean per-example squared error after this epoch.
    pub average_error: f64,
    /// Worst per-example squared error after this epoch.
    pub max_error: f64,
    /// Mini-batches dropped by the failure policy during this epoch.
    pub skipped_batches: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
