use crate::linalg::{Matrix, ShapeError};
use rand::Rng;
use std::{error::Error, fmt};

/// Clamp negative entries to zero, in place. Idempotent.
pub fn relu_in_place(v: &mut [f32]) {
    for x in v {
        if *x < 0.0 {
            *x = 0.0;
        }
    }
}

/// Layer widths for a 3-layer net: input → hidden → hidden → output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MlpDims {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlpShapeError {
    Shape(ShapeError),
    ChainMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for MlpShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlpShapeError::Shape(e) => write!(f, "{}", e),
            MlpShapeError::ChainMismatch {
                stage,
                expected,
                actual,
            } => write!(
                f,
                "{stage} input width ({actual}) must match previous output width ({expected})"
            ),
        }
    }
}

impl From<ShapeError> for MlpShapeError {
    fn from(err: ShapeError) -> Self {
        MlpShapeError::Shape(err)
    }
}

impl Error for MlpShapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlpShapeError::Shape(e) => Some(e),
            MlpShapeError::ChainMismatch { .. } => None,
        }
    }
}

/// 3-layer feed-forward net: y = W3 · ReLU(W2 · ReLU(W1 · x)).
/// No biases. Weights are immutable after construction.
#[derive(Clone, Debug)]
pub struct Mlp {
    w1: Matrix,
    w2: Matrix,
    w3: Matrix,
}

/// Reusable activation buffers for [`Mlp::forward_into`].
/// Overwritten on every call; nothing is retained across samples.
#[derive(Clone, Debug)]
pub struct ForwardScratch {
    hidden1: Vec<f32>,
    hidden2: Vec<f32>,
    output: Vec<f32>,
}

impl ForwardScratch {
    pub fn output(&self) -> &[f32] {
        &self.output
    }
}

impl Mlp {
    /// Validates that the three matrices chain: each stage's input width must
    /// equal the previous stage's output width.
    pub fn new(w1: Matrix, w2: Matrix, w3: Matrix) -> Result<Self, MlpShapeError> {
        if w2.cols() != w1.rows() {
            return Err(MlpShapeError::ChainMismatch {
                stage: "W2",
                expected: w1.rows(),
                actual: w2.cols(),
            });
        }
        if w3.cols() != w2.rows() {
            return Err(MlpShapeError::ChainMismatch {
                stage: "W3",
                expected: w2.rows(),
                actual: w3.cols(),
            });
        }
        Ok(Self { w1, w2, w3 })
    }

    /// Random weights in [-1, 1), drawn once from `rng`.
    pub fn random<R: Rng + ?Sized>(dims: &MlpDims, rng: &mut R) -> Result<Self, MlpShapeError> {
        let w1 = Matrix::random(dims.hidden, dims.input, rng)?;
        let w2 = Matrix::random(dims.hidden, dims.hidden, rng)?;
        let w3 = Matrix::random(dims.output, dims.hidden, rng)?;
        Self::new(w1, w2, w3)
    }

    pub fn input_dim(&self) -> usize {
        self.w1.cols()
    }

    pub fn output_dim(&self) -> usize {
        self.w3.rows()
    }

    pub fn scratch(&self) -> ForwardScratch {
        ForwardScratch {
            hidden1: vec![0.0; self.w1.rows()],
            hidden2: vec![0.0; self.w2.rows()],
            output: vec![0.0; self.w3.rows()],
        }
    }

    /// One forward pass. ReLU between stages, none on the final layer.
    /// Deterministic given weights and input.
    pub fn forward_into(&self, x: &[f32], scratch: &mut ForwardScratch) {
        self.w1.matvec_into(x, &mut scratch.hidden1);
        relu_in_place(&mut scratch.hidden1);

        self.w2.matvec_into(&scratch.hidden1, &mut scratch.hidden2);
        relu_in_place(&mut scratch.hidden2);

        self.w3.matvec_into(&scratch.hidden2, &mut scratch.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn relu_clamps_and_is_idempotent() {
        let mut v = [-2.0, -0.5, 0.0, 0.5, 3.0];
        relu_in_place(&mut v);
        assert_eq!(v, [0.0, 0.0, 0.0, 0.5, 3.0]);
        let once = v;
        relu_in_place(&mut v);
        assert_eq!(v, once, "ReLU must be idempotent");
    }

    #[test]
    fn new_rejects_mismatched_chain() {
        let w1 = Matrix::from_vec(4, 3, vec![0.0; 12]).unwrap();
        let w2 = Matrix::from_vec(4, 5, vec![0.0; 20]).unwrap();
        let w3 = Matrix::from_vec(2, 4, vec![0.0; 8]).unwrap();
        let err = Mlp::new(w1, w2, w3).unwrap_err();
        assert_eq!(
            err,
            MlpShapeError::ChainMismatch {
                stage: "W2",
                expected: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn forward_matches_hand_computed_reference() {
        // 2 → 2 → 2 → 1, weights chosen so one hidden unit goes negative.
        let w1 = Matrix::from_vec(2, 2, vec![1.0, 0.0, -1.0, 1.0]).unwrap();
        let w2 = Matrix::from_vec(2, 2, vec![1.0, 1.0, 0.0, -1.0]).unwrap();
        let w3 = Matrix::from_vec(1, 2, vec![2.0, 1.0]).unwrap();
        let mlp = Mlp::new(w1, w2, w3).unwrap();
        let mut scratch = mlp.scratch();

        // x = [1, 2]: h1 = relu([1, 1]) = [1, 1]
        //             h2 = relu([2, -1]) = [2, 0]
        //             y  = [2*2 + 1*0] = [4]
        mlp.forward_into(&[1.0, 2.0], &mut scratch);
        assert_eq!(scratch.output(), &[4.0]);
    }

    #[test]
    fn forward_is_deterministic_for_fixed_seed() {
        let dims = MlpDims {
            input: 6,
            hidden: 8,
            output: 3,
        };
        let mut rng_a = ChaCha12Rng::seed_from_u64(99);
        let mut rng_b = ChaCha12Rng::seed_from_u64(99);
        let a = Mlp::random(&dims, &mut rng_a).unwrap();
        let b = Mlp::random(&dims, &mut rng_b).unwrap();

        let x: Vec<f32> = (0..6).map(|i| i as f32 * 0.25 - 0.5).collect();
        let mut sa = a.scratch();
        let mut sb = b.scratch();
        a.forward_into(&x, &mut sa);
        b.forward_into(&x, &mut sb);
        assert_eq!(sa.output(), sb.output());

        // Same net, same input, run twice: identical output.
        let before = sa.output().to_vec();
        a.forward_into(&x, &mut sa);
        assert_eq!(sa.output(), &before[..]);
    }
}
