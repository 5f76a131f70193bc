use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Percentage (0 to 100) of examples whose most probable class matches the
/// labelled one. Ties pick the first index on both sides.
pub fn accuracy(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
    if predicted.shape() != expected.shape() {
        return Err(Error::ShapeMismatch(format!(
            "predictions are {:?} but labels are {:?}",
            predicted.shape(),
            expected.shape()
        )));
    }
    if predicted.cols == 0 {
        return Err(Error::InvalidData("accuracy of an empty batch".to_owned()));
    }

    let correct = (0..predicted.cols)
        .filter(|&j| predicted.column_argmax(j) == expected.column_argmax(j))
        .count();
    Ok(correct as f64 / predicted.cols as f64 * 100.0)
}
