use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Training and validation partitions, examples as columns.
#[derive(Debug, Clone)]
pub struct Split {
    pub train_x: Matrix,
    pub train_y: Matrix,
    pub val_x: Matrix,
    pub val_y: Matrix,
}

/// Shuffles the example columns with `rng` and holds out
/// `ceil(m · validation_fraction)` of them for validation.
///
/// Both partitions must end up non-empty.
pub fn train_val_split<R: Rng>(
    x: &Matrix,
    y: &Matrix,
    validation_fraction: f64,
    rng: &mut R,
) -> Result<Split> {
    if x.cols != y.cols {
        return Err(Error::ShapeMismatch(format!(
            "{} input examples but {} labels",
            x.cols, y.cols
        )));
    }
    let m = x.cols;
    let n_val = (m as f64 * validation_fraction).ceil() as usize;
    if n_val == 0 || n_val >= m {
        return Err(Error::InvalidData(format!(
            "cannot hold out {n_val} of {m} examples for validation"
        )));
    }

    let mut indices: Vec<usize> = (0..m).collect();
    indices.shuffle(rng);
    let (val_idx, train_idx) = indices.split_at(n_val);

    Ok(Split {
        train_x: x.select_cols(train_idx),
        train_y: y.select_cols(train_idx),
        val_x: x.select_cols(val_idx),
        val_y: y.select_cols(val_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn numbered(m: usize) -> (Matrix, Matrix) {
        let x = Matrix::from_data(vec![(0..m).map(|j| j as f64).collect()]);
        let y = Matrix::from_data(vec![(0..m).map(|j| -(j as f64)).collect()]);
        (x, y)
    }

    #[test]
    fn holds_out_a_fifth_and_keeps_pairs_together() {
        let (x, y) = numbered(10);
        let split = train_val_split(&x, &y, 0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(split.val_x.cols, 2);
        assert_eq!(split.train_x.cols, 8);
        for (a, b) in split.train_x.data[0].iter().zip(split.train_y.data[0].iter()) {
            assert_eq!(*a, -*b);
        }
        let mut all: Vec<f64> = split.train_x.data[0].iter()
            .chain(split.val_x.data[0].iter())
            .copied()
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(all, (0..10).map(|j| j as f64).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let (x, y) = numbered(20);
        let a = train_val_split(&x, &y, 0.2, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = train_val_split(&x, &y, 0.2, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.val_x, b.val_x);
        assert_eq!(a.train_x, b.train_x);
    }

    #[test]
    fn too_few_examples_is_an_error() {
        let (x, y) = numbered(1);
        assert!(train_val_split(&x, &y, 0.2, &mut StdRng::seed_from_u64(1)).is_err());
    }
}
