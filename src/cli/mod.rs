//! Command-line parsing for the daily price-trend analysis.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::Quality;
use crate::fit::DEFAULT_PREDICT_ITERS;
use crate::hypothesis::DEFAULT_ITERS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ppg",
    version,
    about = "Daily price-per-gram trend fitting and serial-correlation tests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit both trend models, save the charts, and run the serial-correlation tests.
    Run(AnalysisArgs),
    /// Fit both trend models and print their summaries (no tests).
    Fit(AnalysisArgs),
    /// Run the serial-correlation tests only.
    Test(AnalysisArgs),
    /// Write a synthetic transaction CSV in the input format.
    Sample(SampleArgs),
}

/// Options shared by the analysis subcommands.
#[derive(Debug, Parser, Clone)]
pub struct AnalysisArgs {
    /// Transaction CSV with `quality`, `date`, and `ppg` columns.
    #[arg(long, env = "PPG_DATA", value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Quality group to analyse.
    #[arg(short = 'n', long = "name", value_enum, default_value_t = Quality::High)]
    pub name: Quality,

    /// Random seed for permutations and bootstrap refits.
    #[arg(long, default_value_t = 17)]
    pub seed: u64,

    /// Permutations per serial-correlation test.
    #[arg(long, default_value_t = DEFAULT_ITERS)]
    pub iters: usize,

    /// Lag of the serial correlation.
    #[arg(long, default_value_t = 1)]
    pub lag: usize,

    /// Bootstrap refits behind the prediction bands.
    #[arg(long, default_value_t = DEFAULT_PREDICT_ITERS)]
    pub predict_iters: usize,

    /// Directory the SVG charts are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip the SVG charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Export per-day quadratic fit results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export serial-correlation results to JSON.
    #[arg(long = "export-tests")]
    pub export_tests: Option<PathBuf>,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of calendar days to generate.
    #[arg(long, default_value_t = 1240)]
    pub days: usize,

    /// Mean transactions per quality per day.
    #[arg(long, default_value_t = 3.0)]
    pub per_day: f64,

    /// First day of the sample (YYYY-MM-DD).
    #[arg(long, default_value = "2010-09-02")]
    pub start: NaiveDate,

    /// Random seed for the generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
