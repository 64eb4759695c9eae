//! Plotters-powered report charts, saved as SVG files.
//!
//! Three charts per run:
//! - `timeseries11`: observed daily prices with the fitted curve
//! - `timeseries12`: residual percentile lines over time
//! - `timeseries13`: prediction bands over a forward time grid
//!
//! All series and bounds are computed before drawing so the drawing code only
//! deals with styling.

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::domain::DailySeries;
use crate::error::AppError;
use crate::fit::{PercentileLine, PredictionBands, RegressionFit};

const WIDTH: u32 = 960;
const HEIGHT: u32 = 640;

const MODEL_COLOR: RGBColor = RGBColor(255, 127, 14);
const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const PERCENTILE_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// X limits of the fitted-values chart.
pub const FITTED_XLIM: (f64, f64) = (-0.1, 3.8);

type DrawResult = Result<(), Box<dyn Error>>;

/// Title, labels, and optional fixed x-limits of one chart.
#[derive(Debug, Clone)]
pub struct ChartLayout {
    /// File stem of the artifact (`<root>.svg`).
    pub root: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_limits: Option<(f64, f64)>,
}

impl ChartLayout {
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.svg", self.root))
    }
}

pub fn fitted_values_layout() -> ChartLayout {
    ChartLayout {
        root: "timeseries11",
        title: "fitted values",
        x_label: "years",
        y_label: "price per gram ($)",
        x_limits: Some(FITTED_XLIM),
    }
}

pub fn residuals_layout() -> ChartLayout {
    ChartLayout {
        root: "timeseries12",
        title: "residuals",
        x_label: "years",
        y_label: "price per gram ($)",
        x_limits: None,
    }
}

pub fn predictions_layout(grid: &[f64]) -> ChartLayout {
    let x_limits = match (grid.first(), grid.last()) {
        (Some(&lo), Some(&hi)) => Some((lo - 0.1, hi + 0.1)),
        _ => None,
    };
    ChartLayout {
        root: "timeseries13",
        title: "predictions",
        x_label: "years",
        y_label: "price per gram ($)",
        x_limits,
    }
}

/// Scatter of the series plus the fitted curve.
pub fn plot_fitted_values(
    path: &Path,
    layout: &ChartLayout,
    series: &DailySeries,
    fit: &RegressionFit,
) -> Result<(), AppError> {
    let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.years, p.ppg)).collect();
    let curve: Vec<(f64, f64)> = series
        .points
        .iter()
        .zip(&fit.fitted)
        .map(|(p, &f)| (p.years, f))
        .collect();

    let x = layout
        .x_limits
        .unwrap_or_else(|| bounds(points.iter().map(|p| p.0)));
    // Plotters pins out-of-range points to the border instead of clipping.
    let points = within_x(points, x);
    let curve = within_x(curve, x);
    let y = bounds(points.iter().chain(&curve).map(|p| p.1));
    let label = series.quality.name();

    draw(path, layout, x, y, |chart| {
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 2, POINT_COLOR.mix(0.4).filled())),
            )?
            .label(label)
            .legend(|(x, y)| Circle::new((x, y), 3, POINT_COLOR.filled()));
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), MODEL_COLOR.stroke_width(2)))?
            .label("model")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], MODEL_COLOR.stroke_width(2)));
        Ok(())
    })
}

/// Residual percentile lines over time.
pub fn plot_residual_percentiles(
    path: &Path,
    layout: &ChartLayout,
    lines: &[PercentileLine],
) -> Result<(), AppError> {
    let all = || lines.iter().flat_map(|l| l.points.iter());
    let x = layout.x_limits.unwrap_or_else(|| bounds(all().map(|p| p.0)));
    let y = bounds(all().map(|p| p.1));

    draw(path, layout, x, y, |chart| {
        for (line, color) in lines.iter().zip(PERCENTILE_COLORS.iter().cycle()) {
            let style = color.stroke_width(2);
            chart
                .draw_series(LineSeries::new(line.points.iter().copied(), style))?
                .label(format!("{:.0}th", line.percent))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], style));
        }
        Ok(())
    })
}

/// Scatter of the series plus the two shaded prediction bands.
pub fn plot_predictions(
    path: &Path,
    layout: &ChartLayout,
    series: &DailySeries,
    bands: &PredictionBands,
) -> Result<(), AppError> {
    let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.years, p.ppg)).collect();
    let x = layout
        .x_limits
        .unwrap_or_else(|| bounds(bands.grid.iter().copied()));
    let points = within_x(points, x);
    let y = bounds(
        points
            .iter()
            .map(|p| p.1)
            .chain(bands.with_noise.low.iter().copied())
            .chain(bands.with_noise.high.iter().copied()),
    );
    let label = series.quality.name();

    draw(path, layout, x, y, |chart| {
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 2, POINT_COLOR.mix(0.1).filled())),
            )?
            .label(label)
            .legend(|(x, y)| Circle::new((x, y), 3, POINT_COLOR.filled()));

        for (band, alpha) in [(&bands.with_noise, 0.3), (&bands.params_only, 0.5)] {
            let outline: Vec<(f64, f64)> = bands
                .grid
                .iter()
                .copied()
                .zip(band.high.iter().copied())
                .chain(
                    bands
                        .grid
                        .iter()
                        .copied()
                        .zip(band.low.iter().copied())
                        .rev(),
                )
                .collect();
            chart.draw_series(std::iter::once(Polygon::new(outline, BLACK.mix(alpha).filled())))?;
        }
        Ok(())
    })
}

/// Write all three charts into `dir`, returning the written paths.
pub fn save_charts(
    dir: &Path,
    series: &DailySeries,
    fit: &RegressionFit,
    lines: &[PercentileLine],
    bands: &PredictionBands,
) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::numeric(format!("Failed to create output dir '{}': {e}", dir.display()))
    })?;

    let fitted = fitted_values_layout();
    let residuals = residuals_layout();
    let predictions = predictions_layout(&bands.grid);

    let paths = vec![
        fitted.path_in(dir),
        residuals.path_in(dir),
        predictions.path_in(dir),
    ];
    plot_fitted_values(&paths[0], &fitted, series, fit)?;
    plot_residual_percentiles(&paths[1], &residuals, lines)?;
    plot_predictions(&paths[2], &predictions, series, bands)?;

    for path in &paths {
        tracing::info!(path = %path.display(), "saved chart");
    }
    Ok(paths)
}

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw<F>(
    path: &Path,
    layout: &ChartLayout,
    x: (f64, f64),
    y: (f64, f64),
    body: F,
) -> Result<(), AppError>
where
    F: FnOnce(&mut Chart<'_, '_>) -> DrawResult,
{
    render(path, layout, x, y, body).map_err(|e| {
        AppError::numeric(format!(
            "Failed to save chart '{}' to '{}': {e}",
            layout.root,
            path.display()
        ))
    })
}

fn render<F>(path: &Path, layout: &ChartLayout, x: (f64, f64), y: (f64, f64), body: F) -> DrawResult
where
    F: FnOnce(&mut Chart<'_, '_>) -> DrawResult,
{
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(layout.title, ("sans-serif", 22).into_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(x.0..x.1, y.0..y.1)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_label)
        .y_desc(layout.y_label)
        .light_line_style(&WHITE)
        .draw()?;

    body(&mut chart)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Points whose x lies in `[x.0, x.1]`.
fn within_x(points: Vec<(f64, f64)>, x: (f64, f64)) -> Vec<(f64, f64)> {
    points
        .into_iter()
        .filter(|p| (x.0..=x.1).contains(&p.0))
        .collect()
}

/// Padded `(min, max)` of the values; `(0, 1)` when there are none.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo).abs() * 0.05).max(1e-6);
    (lo - pad, hi + pad)
}
