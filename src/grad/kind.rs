use crate::network::network::Network;

/// Which family of parameters a gradient is taken with respect to.
///
/// Both families share the staircase recursion; they differ only in the
/// derivative of `W·a + b` with respect to one of their own parameters and in
/// how many parameters each layer contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Weights,
    Biases,
}

impl ParameterKind {
    /// ∂z/∂p for a parameter of the layer itself, where `input_activation` is
    /// the activation the parameter multiplies. A weight `W[u][k]` contributes
    /// `a[k]`; a bias always contributes 1.
    pub fn linear_derivative(self, input_activation: f64) -> f64 {
        match self {
            ParameterKind::Weights => input_activation,
            ParameterKind::Biases => 1.0,
        }
    }

    /// Parameters owned by each unit of a layer fed by `previous_size` units.
    pub fn parameters_per_unit(self, previous_size: usize) -> usize {
        match self {
            ParameterKind::Weights => previous_size,
            ParameterKind::Biases => 1,
        }
    }

    /// Parameters a layer of `current_size` units adds to the jacobian.
    pub fn connected_parameter_count(self, previous_size: usize, current_size: usize) -> usize {
        self.parameters_per_unit(previous_size) * current_size
    }

    /// Length of the flat gradient for `network`.
    pub fn parameter_count(self, network: &Network) -> usize {
        match self {
            ParameterKind::Weights => network.weight_count(),
            ParameterKind::Biases => network.bias_count(),
        }
    }
}
