use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// One fully connected sigmoid layer.
///
/// `weights` is `size × input_size` and maps the previous layer's activation
/// column to this layer's pre-activation; `biases` is a `size × 1` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Layer {
    /// Glorot-uniform weights, zero biases.
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer {
            size,
            input_size,
            weights: Matrix::glorot(size, input_size, rng),
            biases: Matrix::zeros(size, 1),
        }
    }

    pub fn from_parameters(weights: Matrix, biases: Matrix) -> Result<Layer> {
        if biases.cols != 1 || biases.rows != weights.rows {
            return Err(NetError::DimensionMismatch {
                operation: "layer construction",
                left: weights.dims(),
                right: biases.dims(),
            });
        }

        Ok(Layer {
            size: weights.rows,
            input_size: weights.cols,
            weights,
            biases,
        })
    }

    /// `z = W·a + b` for an input activation column `a`.
    pub fn pre_activation(&self, input: &Matrix) -> Result<Matrix> {
        let mut z = self.weights.multiply(input)?;
        z.add_assign(&self.biases)?;
        Ok(z)
    }

    pub fn feed_from(&self, input: &Matrix) -> Result<Matrix> {
        Ok(self.pre_activation(input)?.sigmoid())
    }

    pub fn parameter_count(&self) -> usize {
        self.size * self.input_size + self.size
    }
}
