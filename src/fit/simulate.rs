//! Bootstrap prediction bands.
//!
//! Each simulated dataset keeps the design columns and replaces the response
//! with `fitted + resampled residuals`; refitting it gives one draw of the
//! coefficients. Predicting every draw over a time grid and taking column-wise
//! percentiles yields two bands:
//!
//! - parameter uncertainty only (predictions of the refitted curves)
//! - parameter uncertainty plus observation noise (residuals resampled onto
//!   each prediction)

use rand::prelude::*;
use rayon::prelude::*;

use crate::error::AppError;
use crate::fit::fitter::{RegressionFit, RegressionFrame, fit_betas};
use crate::math::{iteration_rng, iteration_seeds, percentile_rows, resample};
use crate::models::predict_grid;

/// Default number of bootstrap refits.
pub const DEFAULT_PREDICT_ITERS: usize = 101;
/// Default coverage of the bands, in percent.
pub const DEFAULT_BAND_PERCENT: f64 = 90.0;

/// A low/high envelope over the prediction grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

/// Prediction bands over a time grid.
#[derive(Debug, Clone)]
pub struct PredictionBands {
    pub grid: Vec<f64>,
    pub percent: f64,
    /// Includes resampled residual noise (the wider band).
    pub with_noise: Band,
    /// Coefficient uncertainty only.
    pub params_only: Band,
}

/// Refit the model on `iters` bootstrap datasets.
pub fn simulate_results<R: Rng + ?Sized>(
    frame: &RegressionFrame,
    fit: &RegressionFit,
    iters: usize,
    rng: &mut R,
) -> Result<Vec<RegressionFit>, AppError> {
    let n = frame.len();
    let seeds = iteration_seeds(rng, iters);

    seeds
        .par_iter()
        .map(|&seed| {
            let mut rng = iteration_rng(seed);
            let noise = resample(&fit.residuals, n, &mut rng);
            let fake: Vec<f64> = fit.fitted.iter().zip(&noise).map(|(f, e)| f + e).collect();
            fit_betas(fit.model, &frame.with_response(fake))
        })
        .collect()
}

/// Predict every simulated fit over `grid`.
///
/// With `add_resid`, each prediction row gets residuals of its own fit
/// resampled onto it.
pub fn generate_predictions<R: Rng + ?Sized>(
    results: &[RegressionFit],
    grid: &[f64],
    add_resid: bool,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let seeds = iteration_seeds(rng, results.len());

    results
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(fit, &seed)| {
            let mut row = predict_grid(fit.model, grid, &fit.betas);
            if add_resid {
                let mut rng = iteration_rng(seed);
                let noise = resample(&fit.residuals, grid.len(), &mut rng);
                for (y, e) in row.iter_mut().zip(&noise) {
                    *y += e;
                }
            }
            row
        })
        .collect()
}

/// Compute both prediction bands for a fitted model.
pub fn prediction_bands<R: Rng + ?Sized>(
    frame: &RegressionFrame,
    fit: &RegressionFit,
    grid: &[f64],
    iters: usize,
    percent: f64,
    rng: &mut R,
) -> Result<PredictionBands, AppError> {
    if iters == 0 {
        return Err(AppError::input("Prediction iterations must be > 0."));
    }
    if !(percent > 0.0 && percent < 100.0) {
        return Err(AppError::input("Band percent must be in (0, 100)."));
    }

    let results = simulate_results(frame, fit, iters, rng)?;
    let tail = (100.0 - percent) / 2.0;
    let percents = [tail, 100.0 - tail];

    let with_noise = to_band(percentile_rows(
        &generate_predictions(&results, grid, true, rng),
        &percents,
    ));
    let params_only = to_band(percentile_rows(
        &generate_predictions(&results, grid, false, rng),
        &percents,
    ));

    tracing::debug!(iters, percent, grid_len = grid.len(), "computed prediction bands");

    Ok(PredictionBands {
        grid: grid.to_vec(),
        percent,
        with_noise,
        params_only,
    })
}

fn to_band(mut rows: Vec<Vec<f64>>) -> Band {
    let high = rows.pop().unwrap_or_default();
    let low = rows.pop().unwrap_or_default();
    Band { low, high }
}
