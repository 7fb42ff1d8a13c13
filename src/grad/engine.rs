use crate::data::example::LabeledExample;
use crate::error::{NetError, Result};
use crate::grad::jacobian::StaircaseJacobian;
use crate::grad::kind::ParameterKind;
use crate::loss::squared_error::SquaredError;
use crate::network::network::Network;

/// Exact gradient of the squared output error of `network` on `example`
/// with respect to every parameter of `kind`.
///
/// Entries are ordered by layer, then row-major within the layer's weight
/// matrix (or by row for biases).
pub fn output_error_gradient(
    network: &Network,
    example: &LabeledExample,
    kind: ParameterKind,
) -> Result<Vec<f64>> {
    if example.correct_output.len() != network.output_size {
        return Err(NetError::OutputSizeMismatch {
            expected: network.output_size,
            actual: example.correct_output.len(),
        });
    }

    let jacobian = StaircaseJacobian::build(network, &example.input, kind)?;
    let error_slopes = SquaredError::derivative(jacobian.network_output(), &example.correct_output);
    let output_jacobian = jacobian.output_jacobian();

    // Scale each output row by its error slope, then collapse the rows.
    let mut gradient = vec![0.0; output_jacobian.cols];
    for (row, &slope) in output_jacobian.data.iter().zip(error_slopes.iter()) {
        for (acc, &partial) in gradient.iter_mut().zip(row.iter()) {
            *acc += partial * slope;
        }
    }

    assert_eq!(
        gradient.len(),
        kind.parameter_count(network),
        "staircase width disagrees with the network's parameter count"
    );

    Ok(gradient)
}

/// Weight and bias gradients for one example or a sum over several.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGradient {
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
}

impl NetworkGradient {
    /// Runs the engine once per parameter kind.
    pub fn compute(network: &Network, example: &LabeledExample) -> Result<NetworkGradient> {
        Ok(NetworkGradient {
            weights: output_error_gradient(network, example, ParameterKind::Weights)?,
            biases: output_error_gradient(network, example, ParameterKind::Biases)?,
        })
    }

    pub fn zeros_for(network: &Network) -> NetworkGradient {
        NetworkGradient {
            weights: vec![0.0; network.weight_count()],
            biases: vec![0.0; network.bias_count()],
        }
    }

    /// Sum of the gradients of `examples`, or `None` for an empty slice.
    pub fn sum_over(network: &Network, examples: &[LabeledExample]) -> Result<Option<NetworkGradient>> {
        let mut iter = examples.iter();
        let mut total = match iter.next() {
            Some(first) => NetworkGradient::compute(network, first)?,
            None => return Ok(None),
        };
        for example in iter {
            total.accumulate(&NetworkGradient::compute(network, example)?);
        }
        Ok(Some(total))
    }

    pub fn accumulate(&mut self, other: &NetworkGradient) {
        assert_eq!(self.weights.len(), other.weights.len());
        assert_eq!(self.biases.len(), other.biases.len());

        for (a, b) in self.weights.iter_mut().zip(other.weights.iter()) {
            *a += b;
        }
        for (a, b) in self.biases.iter_mut().zip(other.biases.iter()) {
            *a += b;
        }
    }

    pub fn scaled(mut self, factor: f64) -> NetworkGradient {
        self.weights.iter_mut().for_each(|g| *g *= factor);
        self.biases.iter_mut().for_each(|g| *g *= factor);
        self
    }

    /// Squared euclidean norm over both parameter kinds.
    pub fn squared_norm(&self) -> f64 {
        self.weights.iter().chain(self.biases.iter()).map(|g| g * g).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Network, LabeledExample) {
        let net = Network::new(4, 3, &[5, 3], &mut StdRng::seed_from_u64(17)).unwrap();
        let example = LabeledExample::new(vec![1.0, 0.0, 1.0, 1.0], vec![0.0, 1.0, 0.0]);
        (net, example)
    }

    #[test]
    fn test_gradient_lengths() {
        let (net, example) = setup();
        let grad = NetworkGradient::compute(&net, &example).unwrap();
        assert_eq!(grad.weights.len(), 4 * 5 + 5 * 3 + 3 * 3);
        assert_eq!(grad.biases.len(), 5 + 3 + 3);
    }

    #[test]
    fn test_rejects_wrong_output_length() {
        let (net, _) = setup();
        let bad = LabeledExample::new(vec![1.0, 0.0, 1.0, 1.0], vec![0.0]);
        assert_eq!(
            output_error_gradient(&net, &bad, ParameterKind::Biases).unwrap_err(),
            NetError::OutputSizeMismatch { expected: 3, actual: 1 }
        );
    }

    #[test]
    fn test_rejects_wrong_input_length() {
        let (net, _) = setup();
        let bad = LabeledExample::new(vec![1.0], vec![0.0, 1.0, 0.0]);
        assert!(matches!(
            output_error_gradient(&net, &bad, ParameterKind::Weights),
            Err(NetError::InputSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_output_bias_gradient_is_local() {
        // For an output bias the jacobian column is just sigmoid'(z_u) on row u.
        let (net, example) = setup();
        let biases = output_error_gradient(&net, &example, ParameterKind::Biases).unwrap();
        let trace = net.forward_trace(&example.input).unwrap();
        let out = trace.last().unwrap();

        for u in 0..3 {
            let z = out.pre_activation.data[u][0];
            let a = out.activation.data[u][0];
            let expected = 2.0 * (a - example.correct_output[u])
                * crate::activation::sigmoid::sigmoid_derivative(z);
            assert!((biases[5 + 3 + u] - expected).abs() < 1e-14);
        }
    }

    #[test]
    fn test_sum_over_empty_is_none() {
        let (net, _) = setup();
        assert!(NetworkGradient::sum_over(&net, &[]).unwrap().is_none());
    }

    #[test]
    fn test_sum_over_matches_manual_accumulation() {
        let (net, example) = setup();
        let other = LabeledExample::new(vec![0.0, 1.0, 0.0, 0.5], vec![1.0, 0.0, 0.0]);

        let mut manual = NetworkGradient::compute(&net, &example).unwrap();
        manual.accumulate(&NetworkGradient::compute(&net, &other).unwrap());
        let summed = NetworkGradient::sum_over(&net, &[example, other]).unwrap().unwrap();

        assert_eq!(summed, manual);
    }

    #[test]
    fn test_scaled() {
        let grad = NetworkGradient { weights: vec![2.0, -4.0], biases: vec![1.0] };
        let half = grad.scaled(0.5);
        assert_eq!(half.weights, vec![1.0, -2.0]);
        assert_eq!(half.biases, vec![0.5]);
        assert_eq!(half.squared_norm(), 5.25);
    }
}
