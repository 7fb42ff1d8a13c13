pub struct SquaredError;

impl SquaredError {
    /// Scalar error: sum((predicted - expected)²), not averaged over outputs.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Per-output gradient: 2 * (predicted - expected)
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| 2.0 * (a - b))
            .collect()
    }
}
