use rand::Rng;
use std::{error::Error, fmt};

/// Dense row-major `f32` matrix with construction-time dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    ZeroDimension,
    DataLenMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::ZeroDimension => write!(f, "matrix dimensions must be positive"),
            ShapeError::DataLenMismatch { expected, actual } => write!(
                f,
                "data length ({actual}) must equal rows * cols ({expected})"
            ),
        }
    }
}

impl Error for ShapeError {}

impl Matrix {
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ShapeError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeError::ZeroDimension);
        }
        let expected = rows * cols;
        if data.len() != expected {
            return Err(ShapeError::DataLenMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Entries drawn uniformly from [-1, 1).
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Self, ShapeError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeError::ZeroDimension);
        }
        let data = (0..rows * cols)
            .map(|_| rng.random::<f32>() * 2.0 - 1.0)
            .collect();
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, r: usize) -> &[f32] {
        assert!(r < self.rows, "row index out of range");
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.cols)
    }

    /// y = self · x, multiply-accumulate over each row.
    /// Slice lengths must match the matrix shape; callers validate dimensions
    /// once at construction of whatever owns the matrix.
    pub fn matvec_into(&self, x: &[f32], y: &mut [f32]) {
        assert_eq!(x.len(), self.cols, "input length must equal matrix cols");
        assert_eq!(y.len(), self.rows, "output length must equal matrix rows");
        for (row, out) in self.row_iter().zip(y.iter_mut()) {
            *out = row.iter().zip(x.iter()).map(|(w, xi)| w * xi).sum();
        }
    }

    /// Naive indexed multiply, kept as the correctness oracle for `matvec_into`.
    pub fn matvec_reference(&self, x: &[f32], y: &mut [f32]) {
        assert_eq!(x.len(), self.cols, "input length must equal matrix cols");
        assert_eq!(y.len(), self.rows, "output length must equal matrix rows");
        for i in 0..self.rows {
            let mut sum = 0.0f32;
            for j in 0..self.cols {
                sum += self.data[i * self.cols + j] * x[j];
            }
            y[i] = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn from_vec_rejects_bad_shapes() {
        assert_eq!(
            Matrix::from_vec(0, 3, vec![]),
            Err(ShapeError::ZeroDimension)
        );
        assert_eq!(
            Matrix::from_vec(2, 3, vec![1.0; 5]),
            Err(ShapeError::DataLenMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn matvec_matches_reference_on_random_inputs() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        for &(rows, cols) in &[(1, 1), (3, 5), (16, 9), (32, 32)] {
            let m = Matrix::random(rows, cols, &mut rng).unwrap();
            let x: Vec<f32> = (0..cols).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect();
            let mut fast = vec![0.0; rows];
            let mut naive = vec![0.0; rows];
            m.matvec_into(&x, &mut fast);
            m.matvec_reference(&x, &mut naive);
            for (a, b) in fast.iter().zip(naive.iter()) {
                assert!((a - b).abs() < 1e-5, "optimized path diverged: {a} vs {b}");
            }
        }
    }

    #[test]
    fn matvec_is_linear() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let m = Matrix::random(8, 6, &mut rng).unwrap();
        let a: Vec<f32> = (0..6).map(|_| rng.random::<f32>()).collect();
        let b: Vec<f32> = (0..6).map(|_| rng.random::<f32>()).collect();
        let k = 2.5f32;

        let sum: Vec<f32> = a.iter().zip(b.iter()).map(|(x, y)| x + y).collect();
        let scaled: Vec<f32> = a.iter().map(|x| k * x).collect();

        let mut m_sum = vec![0.0; 8];
        let mut m_a = vec![0.0; 8];
        let mut m_b = vec![0.0; 8];
        let mut m_scaled = vec![0.0; 8];
        m.matvec_into(&sum, &mut m_sum);
        m.matvec_into(&a, &mut m_a);
        m.matvec_into(&b, &mut m_b);
        m.matvec_into(&scaled, &mut m_scaled);

        for i in 0..8 {
            assert!(
                (m_sum[i] - (m_a[i] + m_b[i])).abs() < 1e-5,
                "additivity violated at {i}"
            );
            assert!(
                (m_scaled[i] - k * m_a[i]).abs() < 1e-4,
                "homogeneity violated at {i}"
            );
        }
    }

    #[test]
    fn random_entries_stay_in_range() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let m = Matrix::random(10, 10, &mut rng).unwrap();
        assert!(m.as_slice().iter().all(|v| (-1.0..1.0).contains(v)));
    }
}
