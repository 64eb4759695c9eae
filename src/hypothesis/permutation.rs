//! Generic resampling hypothesis test.
//!
//! A test is described by two functions over some data type `D`:
//!
//! - a statistic `fn(&D) -> f64` (pure, deterministic)
//! - a null model `fn(&D, &mut StdRng) -> D` that draws one dataset consistent
//!   with the null hypothesis
//!
//! [`p_value`] computes the observed statistic once, then draws `iters`
//! datasets from the null model and reports the fraction whose statistic is
//! at least as large as the observed one. Iterations run on the rayon pool;
//! each gets its own generator seeded from the caller's generator, so the
//! outcome depends only on the seed.

use rand::Rng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::error::AppError;
use crate::math::{iteration_rng, iteration_seeds};

/// Default number of null-model draws.
pub const DEFAULT_ITERS: usize = 1000;

/// Result of a resampling test.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    /// Statistic of the observed data.
    pub actual: f64,
    /// Fraction of simulated statistics `>= actual`.
    pub p_value: f64,
    /// Simulated statistics, in iteration order. Serialized as their maximum.
    #[serde(rename = "max_test_stat", serialize_with = "serialize_max")]
    pub test_stats: Vec<f64>,
}

fn serialize_max<S: Serializer>(stats: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(max_of(stats))
}

fn max_of(stats: &[f64]) -> f64 {
    stats.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

impl TestOutcome {
    pub fn iters(&self) -> usize {
        self.test_stats.len()
    }

    /// Largest simulated statistic.
    pub fn max_test_stat(&self) -> f64 {
        max_of(&self.test_stats)
    }
}

/// Run a resampling test.
pub fn p_value<D, S, M, R>(
    data: &D,
    statistic: S,
    run_model: M,
    iters: usize,
    rng: &mut R,
) -> Result<TestOutcome, AppError>
where
    D: Sync,
    S: Fn(&D) -> f64 + Sync,
    M: Fn(&D, &mut StdRng) -> D + Sync,
    R: Rng + ?Sized,
{
    if iters == 0 {
        return Err(AppError::input("Hypothesis test iterations must be > 0."));
    }

    let actual = statistic(data);
    let seeds = iteration_seeds(rng, iters);

    let test_stats: Vec<f64> = seeds
        .par_iter()
        .map(|&seed| {
            let mut rng = iteration_rng(seed);
            statistic(&run_model(data, &mut rng))
        })
        .collect();

    let count = test_stats.iter().filter(|&&x| x >= actual).count();
    let p_value = count as f64 / iters as f64;

    Ok(TestOutcome {
        actual,
        p_value,
        test_stats,
    })
}
