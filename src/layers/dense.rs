use rand::Rng;

use crate::math::matrix::Matrix;

/// Weights and biases of one affine layer.
///
/// `weights` is `[size × input_size]`, `biases` is `[size × 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer{
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
}

/// Gradients of the cost w.r.t. one layer's parameters, averaged over the
/// batch. Same shapes as the matching [`Layer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub d_weights: Matrix,
    pub d_biases: Matrix,
}

impl Layer {
    /// He-style random weights, zero biases.
    pub fn new<R: Rng>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer {
            size,
            weights: Matrix::he(size, input_size, rng),
            biases: Matrix::zeros(size, 1),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, grads: &LayerGradients, lr: f64) {
        self.weights = self.weights.zip_map(&grads.d_weights, |w, g| w - lr * g);
        self.biases = self.biases.zip_map(&grads.d_biases, |b, g| b - lr * g);
    }
}

/// `Z = W·A_prev + b`, with `b` broadcast across the example columns.
pub fn linear_forward(a_prev: &Matrix, weights: &Matrix, biases: &Matrix) -> Matrix {
    weights.dot(a_prev).add_column(biases)
}

/// Chain rule through an affine layer, averaged over the `m` examples in the
/// batch. Returns `(dA_prev, gradients)`:
///
/// - `dW = dZ·A_prevᵗ / m`
/// - `db = rowsum(dZ) / m`
/// - `dA_prev = Wᵗ·dZ`
pub fn linear_backward(dz: &Matrix, a_prev: &Matrix, weights: &Matrix) -> (Matrix, LayerGradients) {
    let m = a_prev.cols as f64;
    let d_weights = dz.dot(&a_prev.transpose()).scale(1.0 / m);
    let d_biases = dz.sum_rows().scale(1.0 / m);
    let da_prev = weights.transpose().dot(dz);
    (da_prev, LayerGradients { d_weights, d_biases })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn new_layer_has_zero_bias_and_matching_shapes() {
        let layer = Layer::new(3, 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(layer.weights.shape(), (3, 5));
        assert_eq!(layer.biases, Matrix::zeros(3, 1));
        assert_eq!(layer.input_size(), 5);
    }

    #[test]
    fn linear_forward_broadcasts_bias() {
        let w = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let b = Matrix::column(vec![0.5]);
        let a = Matrix::from_data(vec![vec![1.0, 0.0], vec![1.0, -1.0]]);
        let z = linear_forward(&a, &w, &b);
        assert_eq!(z.data, vec![vec![3.5, -1.5]]);
    }

    #[test]
    fn linear_backward_averages_over_batch() {
        let w = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let a = Matrix::from_data(vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
        let dz = Matrix::from_data(vec![vec![1.0, -1.0]]);
        let (da_prev, g) = linear_backward(&dz, &a, &w);

        assert_abs_diff_eq!(g.d_weights.data[0][0], (1.0 - 3.0) / 2.0);
        assert_abs_diff_eq!(g.d_weights.data[0][1], (2.0 - 4.0) / 2.0);
        assert_abs_diff_eq!(g.d_biases.data[0][0], 0.0);
        assert_eq!(da_prev.data, vec![vec![1.0, -1.0], vec![2.0, -2.0]]);
    }

    #[test]
    fn apply_gradients_steps_against_the_gradient() {
        let mut layer = Layer {
            size: 1,
            weights: Matrix::from_data(vec![vec![1.0, 1.0]]),
            biases: Matrix::column(vec![0.0]),
        };
        let grads = LayerGradients {
            d_weights: Matrix::from_data(vec![vec![2.0, -2.0]]),
            d_biases: Matrix::column(vec![1.0]),
        };
        layer.apply_gradients(&grads, 0.5);
        assert_eq!(layer.weights.data, vec![vec![0.0, 2.0]]);
        assert_eq!(layer.biases.data, vec![vec![-0.5]]);
    }
}
