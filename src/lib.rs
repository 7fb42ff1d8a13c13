pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod grad;
pub mod data;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use grad::engine::{output_error_gradient, NetworkGradient};
pub use grad::kind::ParameterKind;
pub use data::{AnswerFunction, LabeledExample, TestSet};
pub use optim::sgd::Sgd;
pub use train::{train_network, Trainer, TrainerOptions, TrainingMode, TrainingReport};
