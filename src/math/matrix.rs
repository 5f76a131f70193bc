use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};

/// Dense row-major matrix.
///
/// Throughout the crate a matrix of activations is laid out as
/// `[features × examples]`: one example per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples every entry from N(0, 1) and multiplies it by `scale`.
    pub fn standard_normal<R: Rng>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let z: f64 = rng.sample(StandardNormal);
                res.data[i][j] = z * scale;
            }
        }
        res
    }

    /// He-style initialization scaled by `sqrt(2 / rows)`.
    ///
    /// `rows` is the width of the layer that owns the weights, so the scale
    /// follows the layer's own size rather than its fan-in.
    pub fn he<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / rows as f64).sqrt();
        Matrix::standard_normal(rows, cols, std_dev, rng)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Combines two same-shape matrices entry by entry.
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn zip_map<F>(&self, other: &Matrix, functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(other.data.iter())
                .map(|(row_a, row_b)| {
                    row_a.iter().zip(row_b.iter()).map(|(&a, &b)| functor(a, b)).collect()
                })
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        self.zip_map(other, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product that borrows both operands.
    ///
    /// # Panics
    /// Panics if `self.cols != rhs.rows`.
    pub fn dot(&self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..self.rows {
            let out_row = &mut res.data[i];
            for k in 0..self.cols {
                let a = self.data[i][k];
                if a == 0.0 {
                    continue;
                }
                for (out, &b) in out_row.iter_mut().zip(rhs.data[k].iter()) {
                    *out += a * b;
                }
            }
        }

        res
    }

    /// Adds a `[rows × 1]` column vector to every column of `self`.
    ///
    /// # Panics
    /// Panics if `column` is not `[self.rows × 1]`.
    pub fn add_column(&self, column: &Matrix) -> Matrix {
        assert_eq!(column.shape(), (self.rows, 1), "Broadcast column has incorrect size");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(column.data.iter())
                .map(|(row, c)| row.iter().map(|x| x + c[0]).collect())
                .collect(),
        }
    }

    /// Sums every row into a `[rows × 1]` column.
    pub fn sum_rows(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: 1,
            data: self.data.iter().map(|row| vec![row.iter().sum()]).collect(),
        }
    }

    /// Sum of every column, as a plain vector of length `cols`.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (s, x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        sums
    }

    /// Maximum of every column, as a plain vector of length `cols`.
    pub fn column_max(&self) -> Vec<f64> {
        let mut maxes = vec![f64::NEG_INFINITY; self.cols];
        for row in &self.data {
            for (m, &x) in maxes.iter_mut().zip(row.iter()) {
                if x > *m {
                    *m = x;
                }
            }
        }
        maxes
    }

    /// Index of the largest entry in column `j`. Ties resolve to the first
    /// row encountered.
    pub fn column_argmax(&self, j: usize) -> usize {
        let mut best = 0;
        for i in 1..self.rows {
            if self.data[i][j] > self.data[best][j] {
                best = i;
            }
        }
        best
    }

    /// Copies the contiguous column range `start..end`.
    pub fn slice_cols(&self, start: usize, end: usize) -> Matrix {
        assert!(start <= end && end <= self.cols, "Column range out of bounds");
        Matrix {
            rows: self.rows,
            cols: end - start,
            data: self.data.iter().map(|row| row[start..end].to_vec()).collect(),
        }
    }

    /// Copies the given columns, in the given order.
    pub fn select_cols(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: indices.len(),
            data: self.data.iter()
                .map(|row| indices.iter().map(|&j| row[j]).collect())
                .collect(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|x| x.is_finite())
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    /// Builds a `[n × 1]` column vector.
    pub fn column(values: Vec<f64>) -> Matrix {
        Matrix::from_data(values.into_iter().map(|v| vec![v]).collect())
    }
}
