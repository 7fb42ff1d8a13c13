/// Logistic sigmoid `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// First derivative of the sigmoid at pre-activation `x`.
///
/// `s(x)(1 - s(x))` rewritten as `1 / (2 + e^-x + e^x)` so it needs no second
/// sigmoid evaluation.
pub fn sigmoid_derivative(x: f64) -> f64 {
    1.0 / (2.0 + (-x).exp() + x.exp())
}
