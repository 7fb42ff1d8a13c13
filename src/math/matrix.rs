use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activation::sigmoid::sigmoid;
use crate::error::{NetError, Result};

/// Dense row-major matrix of `f64`.
///
/// Column vectors (`cols == 1`) carry layer activations and biases; every
/// arithmetic operation checks dimensions and reports a mismatch instead of
/// panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Builds a `rows × cols` matrix from row-major flat values.
    pub fn new(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix> {
        if values.len() != rows * cols {
            return Err(NetError::InvalidDataLength {
                expected: rows * cols,
                actual: values.len(),
            });
        }

        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            values.chunks(cols).map(|row| row.to_vec()).collect()
        };

        Ok(Matrix { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// A single-column matrix holding `values`.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Samples every entry uniformly from `[-limit, limit]`.
    pub fn random_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, limit: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = -limit + rng.gen::<f64>() * 2.0 * limit;
            }
        }

        res
    }

    /// Glorot-uniform initialization: limit `sqrt(6 / (rows + cols))`.
    ///
    /// Suited to sigmoid layers, where it keeps pre-activations near the
    /// steep part of the curve at the start of training.
    pub fn glorot<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let limit = (6.0 / (rows + cols) as f64).sqrt();
        Matrix::random_uniform(rows, cols, limit, rng)
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Row-major copy of all entries.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.iter().flat_map(|row| row.iter().copied()).collect()
    }

    /// First column as a plain vector; the natural view of a column matrix.
    pub fn column_values(&self) -> Vec<f64> {
        self.data.iter().map(|row| row[0]).collect()
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise logistic sigmoid.
    pub fn sigmoid(&self) -> Matrix {
        self.map(sigmoid)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn plus(&self, rhs: &Matrix) -> Result<Matrix> {
        let mut res = self.clone();
        res.add_assign(rhs)?;
        Ok(res)
    }

    pub fn minus(&self, rhs: &Matrix) -> Result<Matrix> {
        let mut res = self.clone();
        res.sub_assign(rhs)?;
        Ok(res)
    }

    /// In-place sum. `self` is left untouched when the dimensions differ.
    pub fn add_assign(&mut self, rhs: &Matrix) -> Result<()> {
        self.check_same_dims("add", rhs)?;
        self.zip_assign(rhs, |a, b| a + b);
        Ok(())
    }

    /// In-place difference. `self` is left untouched when the dimensions differ.
    pub fn sub_assign(&mut self, rhs: &Matrix) -> Result<()> {
        self.check_same_dims("subtract", rhs)?;
        self.zip_assign(rhs, |a, b| a - b);
        Ok(())
    }

    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NetError::DimensionMismatch {
                operation: "multiply",
                left: self.dims(),
                right: rhs.dims(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let lhs = self.data[i][k];
                for j in 0..res.cols {
                    res.data[i][j] += lhs * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    fn check_same_dims(&self, operation: &'static str, rhs: &Matrix) -> Result<()> {
        if self.dims() != rhs.dims() {
            return Err(NetError::DimensionMismatch {
                operation,
                left: self.dims(),
                right: rhs.dims(),
            });
        }
        Ok(())
    }

    fn zip_assign<F>(&mut self, rhs: &Matrix, op: F)
    where
        F: Fn(f64, f64) -> f64,
    {
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, &y) in row.iter_mut().zip(rhs_row.iter()) {
                *x = op(*x, y);
            }
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:?}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_rejects_wrong_value_count() {
        let err = Matrix::new(2, 2, &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, NetError::InvalidDataLength { expected: 4, actual: 3 });
    }

    #[test]
    fn test_addition() {
        let m1 = Matrix::new(3, 4, &[1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12.]).unwrap();
        let m2 = Matrix::new(3, 4, &[12., 11., 10., 9., 8., 7., 6., 5., 4., 3., 2., 1.]).unwrap();

        let sum = m1.plus(&m2).unwrap();
        assert_eq!(sum, Matrix::new(3, 4, &[13.0; 12]).unwrap());
    }

    #[test]
    fn test_multiplication() {
        let m1 = Matrix::new(2, 3, &[1., 2., 3., 4., 5., 6.]).unwrap();
        let m2 = Matrix::new(3, 4, &[1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12.]).unwrap();

        let product = m1.multiply(&m2).unwrap();
        assert_eq!(product, Matrix::new(2, 4, &[38., 44., 50., 56., 83., 98., 113., 128.]).unwrap());
    }

    #[test]
    fn test_multiply_rejects_inner_dimension_mismatch() {
        let m1 = Matrix::new(2, 3, &[1., 2., 3., 4., 5., 6.]).unwrap();
        let m2 = Matrix::new(2, 2, &[1., 2., 3., 4.]).unwrap();
        let (before1, before2) = (m1.clone(), m2.clone());

        match m1.multiply(&m2) {
            Err(NetError::DimensionMismatch { left, right, .. }) => {
                assert_eq!(left, (2, 3));
                assert_eq!(right, (2, 2));
            }
            other => panic!("Expected DimensionMismatch, got {:?}", other),
        }
        assert_eq!(m1, before1);
        assert_eq!(m2, before2);
    }

    #[test]
    fn test_add_assign_mismatch_leaves_operands_untouched() {
        let mut m1 = Matrix::new(2, 2, &[1., 2., 3., 4.]).unwrap();
        let m2 = Matrix::new(2, 1, &[1., 1.]).unwrap();
        let before = m1.clone();

        assert!(m1.add_assign(&m2).is_err());
        assert!(m1.sub_assign(&m2).is_err());
        assert!(m1.plus(&m2).is_err());
        assert_eq!(m1, before);
        assert_eq!(m2, Matrix::new(2, 1, &[1., 1.]).unwrap());
    }

    #[test]
    fn test_scale_and_sigmoid() {
        let m = Matrix::column(&[0.0, 2.0]);
        assert_eq!(m.scale(-1.5).column_values(), vec![0.0, -3.0]);
        let s = m.sigmoid();
        assert!((s.get(0, 0) - 0.5).abs() < 1e-12);
        assert!((s.get(1, 0) - 0.880_797_077_977_882_3).abs() < 1e-12);
    }

    #[test]
    fn test_glorot_respects_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::glorot(4, 2, &mut rng);
        let limit = (6.0_f64 / 6.0).sqrt();
        assert!(m.flatten().iter().all(|x| x.abs() <= limit));
    }

    #[test]
    fn test_display_prints_one_row_per_line() {
        let m = Matrix::new(2, 2, &[1., 2., 3., 4.]).unwrap();
        assert_eq!(m.to_string(), "[1.0, 2.0]\n[3.0, 4.0]");
    }
}
