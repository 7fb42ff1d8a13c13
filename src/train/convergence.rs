use serde::{Deserialize, Serialize};

use crate::data::example::LabeledExample;
use crate::error::Result;
use crate::loss::squared_error::SquaredError;
use crate::network::network::Network;
use crate::train::train_config::TrainerOptions;

/// Mean and worst per-example squared error of a network over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub average: f64,
    pub max: f64,
}

impl ErrorSummary {
    /// Runs the forward pass over every example. The accumulators start from
    /// zero on every call.
    pub fn evaluate(network: &Network, examples: &[LabeledExample]) -> Result<ErrorSummary> {
        let mut total = 0.0;
        let mut max: f64 = 0.0;

        for example in examples {
            let output = network.forward(&example.input)?;
            let error = SquaredError::loss(&output, &example.correct_output);
            total += error;
            max = max.max(error);
        }

        let average = if examples.is_empty() { 0.0 } else { total / examples.len() as f64 };
        Ok(ErrorSummary { average, max })
    }

    /// Both bounds must hold at once.
    pub fn is_acceptable(&self, options: &TrainerOptions) -> bool {
        self.average <= options.max_acceptable_average_error
            && self.max <= options.max_acceptable_max_error
    }
}
