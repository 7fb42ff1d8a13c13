use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Per-layer parameter change made by the previous update; feeds the
/// momentum term of the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterIncrement {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
}

impl ParameterIncrement {
    /// All-zero increments shaped like `network`; the state at the start of
    /// every training attempt.
    pub fn zeros_for(network: &Network) -> ParameterIncrement {
        ParameterIncrement {
            weights: network.weights().map(|w| Matrix::zeros(w.rows, w.cols)).collect(),
            biases: network.biases().map(|b| Matrix::zeros(b.rows, b.cols)).collect(),
        }
    }

    /// `after - before`, layer by layer.
    pub fn between(before: &Network, after: &Network) -> Result<ParameterIncrement> {
        let weights = after
            .weights()
            .zip(before.weights())
            .map(|(new, old)| new.minus(old))
            .collect::<Result<Vec<_>>>()?;
        let biases = after
            .biases()
            .zip(before.biases())
            .map(|(new, old)| new.minus(old))
            .collect::<Result<Vec<_>>>()?;

        Ok(ParameterIncrement { weights, biases })
    }

    pub fn is_zero(&self) -> bool {
        self.weights
            .iter()
            .chain(self.biases.iter())
            .all(|m| m.data.iter().flatten().all(|&x| x == 0.0))
    }
}
