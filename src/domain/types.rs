//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and testing
//! - exported to CSV/JSON
//! - built directly in tests without going through the CSV reader

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Days per year used to convert elapsed days into `years` (mean Gregorian year).
pub const DAYS_PER_YEAR: f64 = 365.2425;

/// Quality grade of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Medium,
    Low,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::High, Quality::Medium, Quality::Low];

    pub fn name(self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }

    /// Parse a quality label as it appears in the CSV (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Quality::High),
            "medium" => Some(Quality::Medium),
            "low" => Some(Quality::Low),
            _ => None,
        }
    }
}

/// A single normalized transaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub quality: Quality,
    pub date: NaiveDate,
    /// Price per gram in dollars.
    pub ppg: f64,
}

/// One day of a daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Elapsed years since the first day of the series.
    pub years: f64,
    /// Mean price per gram of that day's transactions.
    pub ppg: f64,
}

/// Daily mean prices for one quality grade, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub quality: Quality,
    pub points: Vec<DailyPoint>,
}

impl DailySeries {
    /// Build a series from `(years, ppg)` pairs.
    ///
    /// Dates are synthesized from `years` relative to 2010-01-01; used by tests
    /// and by callers that only have time offsets.
    pub fn from_years(quality: Quality, years: &[f64], ppg: &[f64]) -> Self {
        let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default();
        let points = years
            .iter()
            .zip(ppg)
            .map(|(&t, &y)| DailyPoint {
                date: start + chrono::Duration::days((t * DAYS_PER_YEAR).round() as i64),
                years: t,
                ppg: y,
            })
            .collect();
        Self { quality, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn years(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.years).collect()
    }

    pub fn ppg(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ppg).collect()
    }

    /// Largest `years` value (0 for an empty series).
    pub fn span_years(&self) -> f64 {
        self.points.last().map(|p| p.years).unwrap_or(0.0)
    }
}

/// Regression model kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `ppg ~ years`
    Linear,
    /// `ppg ~ years + years2`
    Quadratic,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Quadratic => "quadratic",
        }
    }

    /// Formula in the notation used by the summary header.
    pub fn formula(self) -> &'static str {
        match self {
            ModelKind::Linear => "ppg ~ years",
            ModelKind::Quadratic => "ppg ~ years + years2",
        }
    }

    /// Number of coefficients (including the intercept).
    pub fn beta_len(self) -> usize {
        match self {
            ModelKind::Linear => 2,
            ModelKind::Quadratic => 3,
        }
    }

    /// Coefficient names in design-column order.
    pub fn coefficient_names(self) -> &'static [&'static str] {
        match self {
            ModelKind::Linear => &["Intercept", "years"],
            ModelKind::Quadratic => &["Intercept", "years", "years2"],
        }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    /// Population standard deviation of the response.
    pub std_ys: f64,
    /// Sample standard deviation (n - 1) of the residuals.
    pub std_resid: f64,
}

/// One estimated coefficient with its inference statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub value: f64,
    pub std_error: f64,
    pub p_value: f64,
}

/// Which series a serial-correlation test was run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialTarget {
    Price,
    LinearResiduals,
    QuadraticResiduals,
}

impl SerialTarget {
    /// Fixed reporting order.
    pub const ALL: [SerialTarget; 3] = [
        SerialTarget::Price,
        SerialTarget::LinearResiduals,
        SerialTarget::QuadraticResiduals,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            SerialTarget::Price => "price",
            SerialTarget::LinearResiduals => "linear resid",
            SerialTarget::QuadraticResiduals => "quadratic resid",
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    /// Quality group to analyse.
    pub group: Quality,
    pub seed: u64,
    /// Permutation iterations per serial-correlation test.
    pub iters: usize,
    pub lag: usize,
    /// Bootstrap refits behind the prediction bands.
    pub predict_iters: usize,
    pub out_dir: PathBuf,
    pub plot: bool,
    pub export_fit: Option<PathBuf>,
    pub export_tests: Option<PathBuf>,
}

/// Settings for the synthetic transaction generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub days: usize,
    /// Mean transactions per quality per day.
    pub per_day: f64,
    pub seed: u64,
}
