use crate::math::matrix::Matrix;

/// Fixed per-feature normalization across the example axis.
///
/// Each row is shifted by its batch mean and divided by
/// `sqrt(var + f64::EPSILON)` where `var` is the biased (population)
/// variance. There is no learned scale or shift, and the backward pass does
/// not differentiate through this transform.
pub fn apply_batchnorm(a: &Matrix) -> Matrix {
    let m = a.cols as f64;
    let data = a.data.iter()
        .map(|row| {
            let mean = row.iter().sum::<f64>() / m;
            let var = row.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / m;
            let denom = (var + f64::EPSILON).sqrt();
            row.iter().map(|x| (x - mean) / denom).collect()
        })
        .collect();
    Matrix { rows: a.rows, cols: a.cols, data }
}
