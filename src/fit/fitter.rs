//! OLS fitting of the time-trend models.
//!
//! Given a daily series we build a small regression frame:
//! - `years`: elapsed years (from the series)
//! - `years2`: `years²`, derived on demand for the quadratic model
//! - `ppg`: the response
//!
//! and solve the least squares problem for the requested model kind. The
//! derived column is added next to the original ones, so the frame handed back
//! to callers still carries `years` and `ppg` unchanged.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::domain::{Coefficient, DailySeries, FitQuality, ModelKind};
use crate::error::AppError;
use crate::math::{normal_matrix_inverse, solve_least_squares, std_dev};
use crate::models::predict;

/// Columns available to the regression.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFrame {
    pub years: Vec<f64>,
    /// Present once [`RegressionFrame::with_years_squared`] has run.
    pub years2: Option<Vec<f64>>,
    pub ppg: Vec<f64>,
}

impl RegressionFrame {
    pub fn from_series(series: &DailySeries) -> Self {
        Self {
            years: series.years(),
            years2: None,
            ppg: series.ppg(),
        }
    }

    /// Add the squared-time feature, keeping every existing column.
    pub fn with_years_squared(mut self) -> Self {
        self.years2 = Some(self.years.iter().map(|t| t * t).collect());
        self
    }

    /// Same design columns, different response (used by the bootstrap).
    pub fn with_response(&self, ppg: Vec<f64>) -> Self {
        Self {
            years: self.years.clone(),
            years2: self.years2.clone(),
            ppg,
        }
    }

    pub fn len(&self) -> usize {
        self.ppg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ppg.is_empty()
    }

    fn design_matrix(&self, model: ModelKind) -> Result<DMatrix<f64>, AppError> {
        let n = self.len();
        if self.years.len() != n {
            return Err(AppError::numeric("Regression frame columns differ in length."));
        }

        let mut x = DMatrix::<f64>::zeros(n, model.beta_len());
        for i in 0..n {
            x[(i, 0)] = 1.0;
            x[(i, 1)] = self.years[i];
        }

        if model == ModelKind::Quadratic {
            let years2 = self.years2.as_ref().ok_or_else(|| {
                AppError::numeric("Quadratic model requires the derived 'years2' column.")
            })?;
            if years2.len() != n {
                return Err(AppError::numeric("Regression frame columns differ in length."));
            }
            for (i, &t2) in years2.iter().enumerate() {
                x[(i, 2)] = t2;
            }
        }

        Ok(x)
    }
}

/// Result of one OLS fit. Immutable once built.
#[derive(Debug, Clone)]
pub struct RegressionFit {
    pub model: ModelKind,
    pub betas: Vec<f64>,
    pub coefficients: Vec<Coefficient>,
    pub fitted: Vec<f64>,
    /// `ppg - fitted`, aligned with the input rows.
    pub residuals: Vec<f64>,
    pub quality: FitQuality,
}

impl RegressionFit {
    pub fn predict(&self, years: f64) -> f64 {
        predict(self.model, years, &self.betas)
    }

    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// Fit `model` on the frame, including coefficient inference.
pub fn fit_model(model: ModelKind, frame: &RegressionFrame) -> Result<RegressionFit, AppError> {
    let fit = fit_betas(model, frame)?;
    let x = frame.design_matrix(model)?;

    let n = frame.len();
    let p = model.beta_len();
    let sigma2 = if n > p {
        fit.quality.sse / (n - p) as f64
    } else {
        f64::NAN
    };
    let xtx_inv = normal_matrix_inverse(&x);
    let t_dist = if n > p {
        StudentsT::new(0.0, 1.0, (n - p) as f64).ok()
    } else {
        None
    };

    let coefficients = model
        .coefficient_names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let value = fit.betas[j];
            let std_error = xtx_inv
                .as_ref()
                .map(|inv| (sigma2 * inv[(j, j)]).sqrt())
                .unwrap_or(f64::NAN);
            let p_value = match &t_dist {
                Some(t) => {
                    let t_stat = value / std_error;
                    if t_stat.is_nan() {
                        f64::NAN
                    } else {
                        2.0 * (1.0 - t.cdf(t_stat.abs()))
                    }
                }
                None => f64::NAN,
            };
            Coefficient {
                name: (*name).to_string(),
                value,
                std_error,
                p_value,
            }
        })
        .collect();

    Ok(RegressionFit { coefficients, ..fit })
}

/// Fit only the coefficients and residuals (no inference).
///
/// This is the hot path of the prediction bootstrap.
pub fn fit_betas(model: ModelKind, frame: &RegressionFrame) -> Result<RegressionFit, AppError> {
    let n = frame.len();
    let p = model.beta_len();
    if n < p {
        return Err(AppError::insufficient_data(format!(
            "Cannot fit {} model: n={n} observations for {p} coefficients.",
            model.display_name()
        )));
    }
    if frame.ppg.iter().chain(&frame.years).any(|v| !v.is_finite()) {
        return Err(AppError::numeric("Non-finite value in regression input."));
    }

    let x = frame.design_matrix(model)?;
    let y = DVector::from_column_slice(&frame.ppg);

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::numeric(format!(
            "Singular design matrix while fitting the {} model.",
            model.display_name()
        ))
    })?;
    let betas: Vec<f64> = beta.iter().copied().collect();

    let fitted: Vec<f64> = (&x * &beta).iter().copied().collect();
    let residuals: Vec<f64> = frame
        .ppg
        .iter()
        .zip(&fitted)
        .map(|(y, f)| y - f)
        .collect();

    let quality = fit_quality(&frame.ppg, &residuals);
    tracing::debug!(
        model = model.display_name(),
        n,
        sse = quality.sse,
        r_squared = quality.r_squared,
        "fitted regression"
    );

    Ok(RegressionFit {
        model,
        betas,
        coefficients: Vec::new(),
        fitted,
        residuals,
        quality,
    })
}

/// Fit `ppg ~ years`.
pub fn run_linear_model(series: &DailySeries) -> Result<(RegressionFrame, RegressionFit), AppError> {
    let frame = RegressionFrame::from_series(series);
    let fit = fit_model(ModelKind::Linear, &frame)?;
    Ok((frame, fit))
}

/// Fit `ppg ~ years + years2`.
pub fn run_quadratic_model(series: &DailySeries) -> Result<(RegressionFrame, RegressionFit), AppError> {
    let frame = RegressionFrame::from_series(series).with_years_squared();
    let fit = fit_model(ModelKind::Quadratic, &frame)?;
    Ok((frame, fit))
}

/// Fit the requested model kind, deriving whatever features it needs.
pub fn run_model(
    model: ModelKind,
    series: &DailySeries,
) -> Result<(RegressionFrame, RegressionFit), AppError> {
    match model {
        ModelKind::Linear => run_linear_model(series),
        ModelKind::Quadratic => run_quadratic_model(series),
    }
}

fn fit_quality(ys: &[f64], residuals: &[f64]) -> FitQuality {
    let n = ys.len();
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let sst: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { f64::NAN };

    FitQuality {
        n,
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared,
        std_ys: std_dev(ys, 0).unwrap_or(f64::NAN),
        std_resid: std_dev(residuals, 1).unwrap_or(f64::NAN),
    }
}
