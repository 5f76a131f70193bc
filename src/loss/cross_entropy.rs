use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Floor applied to probabilities before `ln()` to keep `ln(0)` finite.
/// NaN is left alone so a diverged network reports a NaN cost.
const EPS: f64 = 1e-12;

/// Categorical cross-entropy averaged over the examples of a batch:
///
/// ```text
/// cost = -(1/m) · Σ_examples Σ_classes [y == 1] · ln(p)
/// ```
///
/// `predicted` and `expected` are both `[classes × m]`; `expected` is one-hot.
pub fn cross_entropy_cost(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
    if predicted.shape() != expected.shape() {
        return Err(Error::ShapeMismatch(format!(
            "predictions are {:?} but labels are {:?}",
            predicted.shape(),
            expected.shape()
        )));
    }
    if predicted.cols == 0 {
        return Err(Error::InvalidData("cost of an empty batch".to_owned()));
    }

    let total: f64 = predicted.data.iter().zip(expected.data.iter())
        .flat_map(|(p_row, y_row)| p_row.iter().zip(y_row.iter()))
        .filter(|(_, &y)| y == 1.0)
        .map(|(&p, _)| (if p.is_nan() { p } else { p.max(EPS) }).ln())
        .sum();

    Ok(-total / predicted.cols as f64)
}
