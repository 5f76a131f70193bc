//! Inverted dropout for hidden layers.
//!
//! `keep_prob` is the probability that a unit survives. Kept units are divided
//! by `keep_prob` in the forward pass so the expected activation is unchanged;
//! the backward pass reuses the exact same mask and scale.

use rand::Rng;

use crate::math::matrix::Matrix;

/// Returns true when `keep_prob` actually drops units.
pub fn is_active(keep_prob: f64) -> bool {
    keep_prob < 1.0
}

/// Draws a 0/1 keep-mask of the given shape. A unit is kept when a uniform
/// draw in `[0, 1)` falls below `keep_prob`.
pub fn keep_mask<R: Rng>(rows: usize, cols: usize, keep_prob: f64, rng: &mut R) -> Matrix {
    let mut mask = Matrix::zeros(rows, cols);
    for row in mask.data.iter_mut() {
        for x in row.iter_mut() {
            if rng.gen::<f64>() < keep_prob {
                *x = 1.0;
            }
        }
    }
    mask
}

/// Zeroes dropped activations and rescales survivors by `1 / keep_prob`.
pub fn dropout_forward(a: &Matrix, mask: &Matrix, keep_prob: f64) -> Matrix {
    a.zip_map(mask, |x, k| x * k / keep_prob)
}

/// Routes the gradient only through units that were kept, with the same
/// `1 / keep_prob` scale the forward pass used.
pub fn dropout_backward(da: &Matrix, mask: &Matrix, keep_prob: f64) -> Matrix {
    da.zip_map(mask, |g, k| g * k / keep_prob)
}
