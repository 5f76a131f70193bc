use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// The two activation kinds a network uses: ReLU for every hidden layer and
/// Softmax for the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    /// Column-wise softmax; each column (one example) sums to 1.
    Softmax,
}

impl ActivationFunction {
    /// Applies the activation to a pre-activation matrix `z`.
    pub fn activate(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::ReLU => relu(z),
            ActivationFunction::Softmax => softmax(z),
        }
    }
}

/// `max(0, z)` element-wise.
pub fn relu(z: &Matrix) -> Matrix {
    z.map(|x| if x > 0.0 { x } else { 0.0 })
}

/// Numerically stable softmax over each column.
///
/// The column maximum is subtracted before exponentiating so large logits
/// cannot overflow.
pub fn softmax(z: &Matrix) -> Matrix {
    let maxes = z.column_max();
    let mut exps = Matrix::zeros(z.rows, z.cols);
    for (out_row, row) in exps.data.iter_mut().zip(z.data.iter()) {
        for ((out, &x), &m) in out_row.iter_mut().zip(row.iter()).zip(maxes.iter()) {
            *out = (x - m).exp();
        }
    }

    let sums = exps.column_sums();
    for row in exps.data.iter_mut() {
        for (x, s) in row.iter_mut().zip(sums.iter()) {
            *x /= s;
        }
    }
    exps
}

/// ReLU derivative applied to an upstream gradient: entries of `da` pass
/// through where the cached pre-activation was positive and become zero
/// everywhere else.
pub fn relu_backward(da: &Matrix, z: &Matrix) -> Matrix {
    da.zip_map(z, |g, x| if x <= 0.0 { 0.0 } else { g })
}

/// Gradient of softmax followed by cross-entropy w.r.t. the logits.
///
/// The composed Jacobian collapses to `predicted - expected`, so the softmax
/// derivative is never formed on its own.
pub fn softmax_backward(predicted: &Matrix, expected: &Matrix) -> Matrix {
    predicted.zip_map(expected, |p, y| p - y)
}
