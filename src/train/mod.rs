pub mod convergence;
pub mod epoch_stats;
pub mod loop_fn;
pub mod state;
pub mod train_config;
pub mod trainer;
pub mod workers;

pub use convergence::ErrorSummary;
pub use epoch_stats::EpochStats;
pub use state::NetworkState;
pub use train_config::{BatchFailurePolicy, TrainerOptions, TrainingMode};
pub use trainer::{train_network, Trainer, TrainingReport};
pub use workers::batch_gradient;
