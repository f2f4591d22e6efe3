use crate::linalg::Matrix;
use crate::mlp::{Mlp, MlpDims};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Instant;
use std::{error::Error, fmt};

/// Forward-pass benchmark configuration. Dimensions default to the
/// 100 → 128 → 128 → 10 net over 100 samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub samples: usize,
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            input_dim: 100,
            hidden_dim: 128,
            output_dim: 10,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchConfigError {
    ZeroSamples,
    ZeroDimension,
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for BenchConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchConfigError::ZeroSamples => write!(f, "samples must be positive"),
            BenchConfigError::ZeroDimension => {
                write!(f, "input, hidden, and output dimensions must be positive")
            }
            BenchConfigError::TooManySamples { max, actual } => {
                write!(f, "samples ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for BenchConfigError {}

impl BenchConfig {
    pub const MAX_SAMPLES: usize = 1_000_000;

    pub fn validate(&self) -> Result<(), BenchConfigError> {
        if self.samples == 0 {
            return Err(BenchConfigError::ZeroSamples);
        }
        if self.samples > Self::MAX_SAMPLES {
            return Err(BenchConfigError::TooManySamples {
                max: Self::MAX_SAMPLES,
                actual: self.samples,
            });
        }
        if self.input_dim == 0 || self.hidden_dim == 0 || self.output_dim == 0 {
            return Err(BenchConfigError::ZeroDimension);
        }
        Ok(())
    }

    fn dims(&self) -> MlpDims {
        MlpDims {
            input: self.input_dim,
            hidden: self.hidden_dim,
            output: self.output_dim,
        }
    }
}

/// Timing report for one benchmark run. The numeric outputs themselves are
/// not checked here; kernel correctness is covered by the linalg and mlp tests.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct BenchReport {
    pub samples: usize,
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub elapsed_ms: f64,
    pub per_sample_us: f64,
}

/// Generate random weights and inputs once, then time a single pass of the
/// forward computation over every sample.
pub fn run(config: &BenchConfig) -> Result<BenchReport, BenchConfigError> {
    config.validate()?;
    let mut rng = ChaCha12Rng::seed_from_u64(config.seed);

    let mlp = Mlp::random(&config.dims(), &mut rng)
        .expect("validated dimensions must produce a valid net");
    let inputs = Matrix::random(config.samples, config.input_dim, &mut rng)
        .expect("validated dimensions must produce a valid input batch");
    let mut scratch = mlp.scratch();

    let start = Instant::now();
    for x in inputs.row_iter() {
        mlp.forward_into(x, &mut scratch);
        black_box(scratch.output());
    }
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(BenchReport {
        samples: config.samples,
        input_dim: config.input_dim,
        hidden_dim: config.hidden_dim,
        output_dim: config.output_dim,
        elapsed_ms,
        per_sample_us: elapsed_ms * 1000.0 / config.samples as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_fixed_shapes() {
        let c = BenchConfig::default();
        assert_eq!((c.samples, c.input_dim, c.hidden_dim, c.output_dim), (100, 100, 128, 10));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_configs() {
        let zero_samples = BenchConfig {
            samples: 0,
            ..BenchConfig::default()
        };
        assert_eq!(zero_samples.validate(), Err(BenchConfigError::ZeroSamples));

        let zero_dim = BenchConfig {
            hidden_dim: 0,
            ..BenchConfig::default()
        };
        assert_eq!(zero_dim.validate(), Err(BenchConfigError::ZeroDimension));

        let too_many = BenchConfig {
            samples: BenchConfig::MAX_SAMPLES + 1,
            ..BenchConfig::default()
        };
        assert_eq!(
            too_many.validate(),
            Err(BenchConfigError::TooManySamples {
                max: BenchConfig::MAX_SAMPLES,
                actual: BenchConfig::MAX_SAMPLES + 1,
            })
        );
    }

    #[test]
    fn tiny_run_reports_its_config() {
        let config = BenchConfig {
            samples: 4,
            input_dim: 5,
            hidden_dim: 6,
            output_dim: 2,
            seed: 42,
        };
        let report = run(&config).unwrap();
        assert_eq!(report.samples, 4);
        assert_eq!(report.output_dim, 2);
        assert!(report.elapsed_ms >= 0.0);
        assert!(report.per_sample_us >= 0.0);
    }
}
