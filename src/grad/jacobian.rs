use crate::activation::sigmoid::sigmoid_derivative;
use crate::error::Result;
use crate::grad::kind::ParameterKind;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Per-layer jacobians of the activations with respect to every parameter of
/// one kind seen so far, for a single input.
///
/// ```text
///           P(0)     P(1)     P(2)   ...   P(n)
///   A(0)   G00       -        -      ...    -
///   A(1)   G10      G11       -      ...    -
///   A(2)   G20      G21      G22     ...    -
///    .      .        .        .       .     .
///   A(n)   Gn0      Gn1      Gn2     ...   Gnn
/// ```
///
/// `A(i)` is the activation column of layer `i` (hidden layers first, output
/// last) and `P(j)` the parameters of layer `j`, flattened row-major for
/// weights (`W[u][k] -> u * cols + k`) and by row for biases. `Gij[u][v]` is
/// ∂A(i)[u] / ∂P(j)[v]. Layer `i` stores the whole row `Gi0 .. Gii` as one
/// matrix, so its width grows with every layer.
#[derive(Debug, Clone)]
pub struct StaircaseJacobian {
    kind: ParameterKind,
    layers: Vec<Matrix>,
    output: Vec<f64>,
}

impl StaircaseJacobian {
    /// Runs the forward recursion over `network` for `input`.
    pub fn build(network: &Network, input: &[f64], kind: ParameterKind) -> Result<StaircaseJacobian> {
        let traces = network.forward_trace(input)?;
        let mut layers: Vec<Matrix> = Vec::with_capacity(network.layers.len());
        let mut previous_activation = Matrix::column(input);

        for (layer, trace) in network.layers.iter().zip(traces.iter()) {
            let inherited = layers.last().map_or(0, |g| g.cols);
            let per_unit = kind.parameters_per_unit(layer.input_size);
            let connected = kind.connected_parameter_count(layer.input_size, layer.size);

            let slopes: Vec<f64> = trace
                .pre_activation
                .column_values()
                .into_iter()
                .map(sigmoid_derivative)
                .collect();

            let mut current = Matrix::zeros(layer.size, inherited + connected);

            // Own parameters: each unit only reaches its own row.
            for (u, &slope) in slopes.iter().enumerate() {
                for k in 0..per_unit {
                    current.data[u][inherited + u * per_unit + k] =
                        kind.linear_derivative(previous_activation.data[k][0]) * slope;
                }
            }

            // Inherited parameters: chain rule through this layer's weights.
            if let Some(previous) = layers.last() {
                let deep = layer.weights.multiply(previous)?;
                for (u, &slope) in slopes.iter().enumerate() {
                    for c in 0..inherited {
                        current.data[u][c] = deep.data[u][c] * slope;
                    }
                }
            }

            layers.push(current);
            previous_activation = trace.activation.clone();
        }

        Ok(StaircaseJacobian {
            kind,
            layers,
            output: previous_activation.column_values(),
        })
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// `G[0] ..= G[hidden_layer_count]`.
    pub fn layers(&self) -> &[Matrix] {
        &self.layers
    }

    /// Jacobian of the network output, one column per parameter.
    pub fn output_jacobian(&self) -> &Matrix {
        &self.layers[self.layers.len() - 1]
    }

    /// Network output computed along the way.
    pub fn network_output(&self) -> &[f64] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network() -> Network {
        Network::new(3, 2, &[2, 4], &mut StdRng::seed_from_u64(21)).unwrap()
    }

    #[test]
    fn test_staircase_widths_for_weights() {
        let net = network();
        let jac = StaircaseJacobian::build(&net, &[0.5, -1.0, 0.25], ParameterKind::Weights).unwrap();

        let dims: Vec<_> = jac.layers().iter().map(|g| g.dims()).collect();
        assert_eq!(dims, vec![(2, 6), (4, 14), (2, 22)]);
    }

    #[test]
    fn test_staircase_widths_for_biases() {
        let net = network();
        let jac = StaircaseJacobian::build(&net, &[0.5, -1.0, 0.25], ParameterKind::Biases).unwrap();

        let dims: Vec<_> = jac.layers().iter().map(|g| g.dims()).collect();
        assert_eq!(dims, vec![(2, 2), (4, 6), (2, 8)]);
    }

    #[test]
    fn test_first_layer_block_is_row_diagonal() {
        let net = network();
        let input = [0.5, -1.0, 0.25];
        let jac = StaircaseJacobian::build(&net, &input, ParameterKind::Weights).unwrap();
        let z0 = net.layers[0].pre_activation(&Matrix::column(&input)).unwrap();
        let g0 = &jac.layers()[0];

        for u in 0..2 {
            for c in 0..6 {
                let expected = if c / 3 == u {
                    input[c % 3] * sigmoid_derivative(z0.data[u][0])
                } else {
                    0.0
                };
                assert_eq!(g0.data[u][c], expected);
            }
        }
    }

    #[test]
    fn test_inherited_columns_follow_chain_rule() {
        let net = network();
        let input = [0.1, 0.2, 0.3];
        let jac = StaircaseJacobian::build(&net, &input, ParameterKind::Biases).unwrap();
        let traces = net.forward_trace(&input).unwrap();

        let g0 = &jac.layers()[0];
        let g1 = &jac.layers()[1];
        let w1 = &net.layers[1].weights;
        for u in 0..4 {
            let slope = sigmoid_derivative(traces[1].pre_activation.data[u][0]);
            for c in 0..2 {
                let deep: f64 = (0..2).map(|k| w1.data[u][k] * g0.data[k][c]).sum();
                assert!((g1.data[u][c] - deep * slope).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_output_matches_forward() {
        let net = network();
        let input = [1.0, 0.0, 1.0];
        let jac = StaircaseJacobian::build(&net, &input, ParameterKind::Weights).unwrap();
        assert_eq!(jac.network_output(), net.forward(&input).unwrap().as_slice());
    }
}
