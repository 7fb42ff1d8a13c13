use crate::error::{NetError, Result};
use crate::grad::engine::NetworkGradient;
use crate::network::network::Network;
use crate::optim::increment::ParameterIncrement;

/// Gradient descent with a fixed learning rate and momentum.
///
/// Every parameter moves by `-learning_rate * gradient + momentum * previous`,
/// where `previous` is the change the same parameter received on the last
/// update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum }
    }

    /// Applies one update and returns the new network together with the
    /// increment it represents. `network` itself is not modified.
    pub fn step(
        &self,
        network: &Network,
        gradient: &NetworkGradient,
        previous: &ParameterIncrement,
    ) -> Result<(Network, ParameterIncrement)> {
        check_len(network.weight_count(), gradient.weights.len())?;
        check_len(network.bias_count(), gradient.biases.len())?;

        let mut updated = network.clone();
        let mut weight_index = 0;
        let mut bias_index = 0;

        for (i, layer) in updated.layers.iter_mut().enumerate() {
            let prev_w = &previous.weights[i];
            for (j, row) in layer.weights.data.iter_mut().enumerate() {
                for (k, w) in row.iter_mut().enumerate() {
                    *w = *w - self.learning_rate * gradient.weights[weight_index]
                        + self.momentum * prev_w.data[j][k];
                    weight_index += 1;
                }
            }

            let prev_b = &previous.biases[i];
            for (j, row) in layer.biases.data.iter_mut().enumerate() {
                row[0] = row[0] - self.learning_rate * gradient.biases[bias_index]
                    + self.momentum * prev_b.data[j][0];
                bias_index += 1;
            }
        }

        let increment = ParameterIncrement::between(network, &updated)?;
        Ok((updated, increment))
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(NetError::InvalidDataLength { expected, actual });
    }
    Ok(())
}
