//! Serial-correlation permutation test.
//!
//! Statistic: `|corr(x[t], x[t - lag])|`. Null model: the same values in a
//! random order, which keeps the marginal distribution and destroys any
//! dependence between neighbouring observations.
//!
//! When the lagged correlation is undefined (fewer than two pairs, or a
//! constant side) the statistic is `0.0`. A degenerate series therefore has
//! `actual = 0` and a p-value of `1`.

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::AppError;
use crate::hypothesis::permutation::{TestOutcome, p_value};
use crate::math::{permute, serial_corr};

/// Observed data for a serial-correlation test.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialData {
    pub series: Vec<f64>,
    pub lag: usize,
}

/// Absolute lagged correlation (0 when undefined).
pub fn serial_corr_statistic(data: &SerialData) -> f64 {
    serial_corr(&data.series, data.lag)
        .map(f64::abs)
        .unwrap_or(0.0)
}

/// Shuffle the series values; the lag is unchanged.
pub fn permute_series(data: &SerialData, rng: &mut StdRng) -> SerialData {
    SerialData {
        series: permute(&data.series, rng),
        lag: data.lag,
    }
}

/// Test `series` for serial correlation at `lag`.
pub fn serial_correlation_test<R: Rng + ?Sized>(
    series: &[f64],
    lag: usize,
    iters: usize,
    rng: &mut R,
) -> Result<TestOutcome, AppError> {
    if lag == 0 {
        return Err(AppError::input("Serial-correlation lag must be >= 1."));
    }

    let data = SerialData {
        series: series.to_vec(),
        lag,
    };
    p_value(&data, serial_corr_statistic, permute_series, iters, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::StandardNormal;

    #[test]
    fn linear_series_is_strongly_autocorrelated() {
        let series: Vec<f64> = (1..=10).map(f64::from).collect();
        let outcome = serial_correlation_test(&series, 1, 1000, &mut StdRng::seed_from_u64(17)).unwrap();

        assert!((outcome.actual - 1.0).abs() < 1e-12);
        assert!(outcome.p_value < 0.01, "p = {}", outcome.p_value);
    }

    #[test]
    fn white_noise_is_not() {
        let mut rng = StdRng::seed_from_u64(2024);
        let series: Vec<f64> = (0..1000).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let outcome = serial_correlation_test(&series, 1, 500, &mut rng).unwrap();

        assert!(outcome.actual < 0.12, "actual = {}", outcome.actual);
        assert!((0.0..=1.0).contains(&outcome.p_value));
    }

    #[test]
    fn short_series_is_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        for series in [vec![], vec![3.0], vec![3.0, 4.0]] {
            let outcome = serial_correlation_test(&series, 1, 20, &mut rng).unwrap();
            assert_eq!(outcome.actual, 0.0);
            assert_eq!(outcome.p_value, 1.0);
        }
    }

    #[test]
    fn constant_series_is_degenerate() {
        let outcome =
            serial_correlation_test(&[5.0; 12], 1, 20, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(outcome.actual, 0.0);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn permutation_keeps_lag_and_values() {
        let data = SerialData {
            series: vec![4.0, 1.0, 3.0, 2.0, 5.0],
            lag: 2,
        };
        let shuffled = permute_series(&data, &mut StdRng::seed_from_u64(8));
        assert_eq!(shuffled.lag, 2);

        let mut values = shuffled.series.clone();
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn zero_lag_rejected() {
        let err = serial_correlation_test(&[1.0, 2.0, 3.0], 0, 10, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
