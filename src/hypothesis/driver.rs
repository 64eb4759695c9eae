//! Serial-correlation checks on a daily price series.
//!
//! Three independent tests in a fixed order:
//!
//! 1. the raw daily prices
//! 2. residuals of the linear model
//! 3. residuals of the quadratic model
//!
//! There is no combined verdict; each report stands on its own.

use rand::Rng;
use serde::Serialize;

use crate::domain::{DailySeries, SerialTarget};
use crate::error::AppError;
use crate::fit::{run_linear_model, run_quadratic_model};
use crate::hypothesis::permutation::TestOutcome;
use crate::hypothesis::serial::serial_correlation_test;

/// One serial-correlation test result.
#[derive(Debug, Clone, Serialize)]
pub struct SerialReport {
    pub target: SerialTarget,
    pub lag: usize,
    pub iters: usize,
    #[serde(flatten)]
    pub outcome: TestOutcome,
}

/// Run the three serial-correlation tests on `series`.
pub fn test_serial_corr<R: Rng + ?Sized>(
    series: &DailySeries,
    lag: usize,
    iters: usize,
    rng: &mut R,
) -> Result<Vec<SerialReport>, AppError> {
    let (_, linear) = run_linear_model(series)?;
    let (_, quadratic) = run_quadratic_model(series)?;

    let mut reports = Vec::with_capacity(SerialTarget::ALL.len());
    for target in SerialTarget::ALL {
        let values = match target {
            SerialTarget::Price => series.ppg(),
            SerialTarget::LinearResiduals => linear.residuals.clone(),
            SerialTarget::QuadraticResiduals => quadratic.residuals.clone(),
        };

        let outcome = serial_correlation_test(&values, lag, iters, rng)?;
        tracing::info!(
            series = target.display_name(),
            lag,
            iters,
            actual = outcome.actual,
            p_value = outcome.p_value,
            "serial correlation test"
        );

        reports.push(SerialReport {
            target,
            lag,
            iters,
            outcome,
        });
    }

    Ok(reports)
}
