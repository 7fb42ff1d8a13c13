#![allow(dead_code)]

use jacobian_nn::{LabeledExample, Matrix, Network};

/// 3 → [2, 4] → 2 network with hand-picked parameters.
pub fn fixture_network() -> Network {
    let weights = vec![
        Matrix::new(2, 3, &[-1.0, 0.0, 1.0, -2.0, 0.0, 2.0]).unwrap(),
        Matrix::new(4, 2, &[0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0]).unwrap(),
        Matrix::new(2, 4, &[-2.0, -1.0, 1.0, 2.0, -4.0, -3.0, 3.0, 4.0]).unwrap(),
    ];
    let biases = vec![
        Matrix::column(&[1.0, -1.0]),
        Matrix::column(&[-1.0, 0.0, 0.0, 1.0]),
        Matrix::column(&[1.0, -1.0]),
    ];
    Network::from_parameters(3, 2, &[2, 4], weights, biases).unwrap()
}

/// The fixture network outputs almost exactly this target for this input.
pub fn fixture_example() -> LabeledExample {
    LabeledExample::new(vec![1.0, 0.0, 1.0], vec![0.866, 0.688])
}

pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
