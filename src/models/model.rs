//! Model evaluation for the linear and quadratic time-trend models.
//!
//! The fitter builds its design matrix from the regression frame; everything
//! downstream (prediction grids, bootstrap bands, plots) only needs to evaluate
//! a fitted model at arbitrary time offsets, which is implemented here.

use crate::domain::ModelKind;

/// Predict ppg at `years` for the given model kind.
pub fn predict(model: ModelKind, years: f64, betas: &[f64]) -> f64 {
    match model {
        ModelKind::Linear => betas[0] + betas[1] * years,
        ModelKind::Quadratic => betas[0] + betas[1] * years + betas[2] * years * years,
    }
}

/// Predict over a grid of time offsets.
pub fn predict_grid(model: ModelKind, grid: &[f64], betas: &[f64]) -> Vec<f64> {
    grid.iter().map(|&t| predict(model, t, betas)).collect()
}
