//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and groups the transaction data
//! - fits the trend models and prints their summaries
//! - writes charts and optional exports
//! - runs the serial-correlation tests

use clap::Parser;

use crate::cli::{AnalysisArgs, Command, SampleArgs};
use crate::domain::{AnalysisConfig, SampleConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ppg` binary.
pub fn run() -> Result<(), AppError> {
    // Best-effort: a missing `.env` is fine, PPG_DATA may come from the shell.
    dotenvy::dotenv().ok();

    // We want `ppg` and `ppg --csv prices.csv` to behave like `ppg run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(&config_from_args(&args)?),
        Command::Fit(args) => handle_fit(&config_from_args(&args)?),
        Command::Test(args) => handle_test(&config_from_args(&args)?),
        Command::Sample(args) => handle_sample(&args),
    }
}

fn handle_run(config: &AnalysisConfig) -> Result<(), AppError> {
    let run = pipeline::run_analysis(config)?;

    println!("{}", crate::report::format_series_header(&run.group.series));
    print_fits(&run.fits);
    println!("{}", crate::report::format_serial_reports(&run.reports));

    export_fit(config, &run.group.series, &run.fits)?;
    if let Some(path) = &config.export_tests {
        crate::io::export::write_tests_json(path, &run.reports)?;
    }
    Ok(())
}

fn handle_fit(config: &AnalysisConfig) -> Result<(), AppError> {
    let group = pipeline::load_group(config)?;
    let fits = pipeline::run_fits(config, &group.series)?;

    println!("{}", crate::report::format_series_header(&group.series));
    print_fits(&fits);

    export_fit(config, &group.series, &fits)
}

fn handle_test(config: &AnalysisConfig) -> Result<(), AppError> {
    let group = pipeline::load_group(config)?;
    let reports = pipeline::run_tests(config, &group.series)?;

    println!("{}", crate::report::format_series_header(&group.series));
    println!("{}", crate::report::format_serial_reports(&reports));

    if let Some(path) = &config.export_tests {
        crate::io::export::write_tests_json(path, &reports)?;
    }
    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        start: args.start,
        days: args.days,
        per_day: args.per_day,
        seed: args.seed,
    };
    let transactions = crate::data::generate_sample(&config)?;
    crate::io::export::write_transactions_csv(&args.out, &transactions)?;

    println!(
        "Wrote {} transactions ({} days) to {}",
        transactions.len(),
        config.days,
        args.out.display()
    );
    Ok(())
}

fn print_fits(fits: &pipeline::FitOutput) {
    println!("{}", crate::report::format_fit_summary(&fits.linear));
    println!("{}", crate::report::format_fit_summary(&fits.quadratic));
    for path in &fits.charts {
        println!("Saved {}", path.display());
    }
}

fn export_fit(
    config: &AnalysisConfig,
    series: &crate::domain::DailySeries,
    fits: &pipeline::FitOutput,
) -> Result<(), AppError> {
    if let Some(path) = &config.export_fit {
        crate::io::export::write_fit_csv(path, series, &fits.quadratic)?;
    }
    Ok(())
}

pub fn config_from_args(args: &AnalysisArgs) -> Result<AnalysisConfig, AppError> {
    let Some(csv_path) = args.csv.clone() else {
        return Err(AppError::input(
            "No input CSV: pass --csv <path> or set PPG_DATA (a .env file works too).",
        ));
    };
    if args.lag == 0 {
        return Err(AppError::input("Lag must be >= 1."));
    }
    if args.iters == 0 {
        return Err(AppError::input("Iterations must be > 0."));
    }
    if args.predict_iters == 0 {
        return Err(AppError::input("Prediction iterations must be > 0."));
    }

    Ok(AnalysisConfig {
        csv_path,
        group: args.name,
        seed: args.seed,
        iters: args.iters,
        lag: args.lag,
        predict_iters: args.predict_iters,
        out_dir: args.out_dir.clone(),
        plot: !args.no_plot,
        export_fit: args.export.clone(),
        export_tests: args.export_tests.clone(),
    })
}

/// Rewrite argv so `ppg` defaults to `ppg run`.
///
/// Rules:
/// - `ppg`                      -> `ppg run`
/// - `ppg --csv x.csv ...`      -> `ppg run --csv x.csv ...`
/// - `ppg --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fit" | "test" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_pipeline() {
        assert_eq!(rewrite_args(argv(&["ppg"])), argv(&["ppg", "run"]));
        assert_eq!(
            rewrite_args(argv(&["ppg", "--csv", "a.csv"])),
            argv(&["ppg", "run", "--csv", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for args in [&["ppg", "test", "--lag", "2"][..], &["ppg", "--help"][..]] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn config_requires_csv_and_positive_lag() {
        let mut args = AnalysisArgs::parse_from(["run"]);
        args.csv = None;
        assert_eq!(config_from_args(&args).unwrap_err().exit_code(), 2);

        args.csv = Some("prices.csv".into());
        args.lag = 0;
        assert_eq!(config_from_args(&args).unwrap_err().exit_code(), 2);

        args.lag = 3;
        let config = config_from_args(&args).unwrap();
        assert_eq!(config.lag, 3);
        assert!(config.plot);
    }
}
