//! Shared analysis pipeline used by every analysis subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> daily grouping -> model fits -> prediction bands -> charts -> tests
//!
//! The subcommands in `app` then only decide which stages to run and what to print.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::{group_by_quality_and_day, select_group};
use crate::domain::{AnalysisConfig, DailySeries};
use crate::error::AppError;
use crate::fit::{
    DEFAULT_BAND_PERCENT, PercentileLine, PredictionBands, RESIDUAL_BINS, RESIDUAL_PERCENTS,
    RegressionFit, prediction_bands, residual_percentiles, run_linear_model, run_quadratic_model,
};
use crate::hypothesis::{SerialReport, test_serial_corr};
use crate::io::ingest::{IngestedData, load_transactions};
use crate::math::linspace;

/// Forward time grid (years) of the prediction chart.
pub const PREDICTION_GRID: (f64, f64, usize) = (0.0, 5.0, 101);

/// Mixed into the seed of the bootstrap generator so the bands and the
/// permutation tests draw from independent streams.
const BAND_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The loaded input and the selected quality group.
#[derive(Debug, Clone)]
pub struct LoadedGroup {
    pub ingest: IngestedData,
    pub series: DailySeries,
}

/// Everything computed by the fitting stage.
#[derive(Debug, Clone)]
pub struct FitOutput {
    pub linear: RegressionFit,
    pub quadratic: RegressionFit,
    pub residual_lines: Vec<PercentileLine>,
    pub bands: PredictionBands,
    /// Chart files written (empty when plotting is off).
    pub charts: Vec<PathBuf>,
}

/// All computed outputs of a single `ppg run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub group: LoadedGroup,
    pub fits: FitOutput,
    pub reports: Vec<SerialReport>,
}

/// Read the CSV and build the daily series of the configured group.
pub fn load_group(config: &AnalysisConfig) -> Result<LoadedGroup, AppError> {
    let ingest = load_transactions(&config.csv_path)?;
    let dailies = group_by_quality_and_day(&ingest.transactions);
    let series = select_group(&dailies, config.group)?.clone();

    tracing::info!(
        quality = series.quality.name(),
        days = series.len(),
        span_years = series.span_years(),
        "selected group"
    );
    Ok(LoadedGroup { ingest, series })
}

/// Fit both models, compute residual percentiles and prediction bands, and
/// write the charts when enabled.
pub fn run_fits(config: &AnalysisConfig, series: &DailySeries) -> Result<FitOutput, AppError> {
    let (_, linear) = run_linear_model(series)?;
    let (frame, quadratic) = run_quadratic_model(series)?;

    let residual_lines = residual_percentiles(
        &series.years(),
        &quadratic.residuals,
        RESIDUAL_BINS,
        &RESIDUAL_PERCENTS,
    );

    let (start, stop, num) = PREDICTION_GRID;
    let grid = linspace(start, stop, num);
    let mut rng = StdRng::seed_from_u64(config.seed ^ BAND_SEED_SALT);
    let bands = prediction_bands(
        &frame,
        &quadratic,
        &grid,
        config.predict_iters,
        DEFAULT_BAND_PERCENT,
        &mut rng,
    )?;

    let charts = if config.plot {
        crate::plot::save_charts(&config.out_dir, series, &quadratic, &residual_lines, &bands)?
    } else {
        Vec::new()
    };

    Ok(FitOutput {
        linear,
        quadratic,
        residual_lines,
        bands,
        charts,
    })
}

/// Run the three serial-correlation tests with the configured seed.
pub fn run_tests(config: &AnalysisConfig, series: &DailySeries) -> Result<Vec<SerialReport>, AppError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    test_serial_corr(series, config.lag, config.iters, &mut rng)
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let group = load_group(config)?;
    let fits = run_fits(config, &group.series)?;
    let reports = run_tests(config, &group.series)?;
    Ok(RunOutput {
        group,
        fits,
        reports,
    })
}
