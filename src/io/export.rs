//! Export per-day fit results (CSV), serial-correlation reports (JSON), and
//! synthetic transactions (CSV, readable by `ingest`).
//!
//! All are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DailySeries, Transaction};
use crate::error::AppError;
use crate::fit::RegressionFit;
use crate::hypothesis::SerialReport;

/// Write per-day observed, fitted, and residual values to a CSV file.
pub fn write_fit_csv(path: &Path, series: &DailySeries, fit: &RegressionFit) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::numeric(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,quality,model,years,ppg,fitted,residual")
        .map_err(|e| AppError::numeric(format!("Failed to write export CSV header: {e}")))?;

    for ((p, fitted), resid) in series.points.iter().zip(&fit.fitted).zip(&fit.residuals) {
        writeln!(
            file,
            "{},{},{},{:.10},{:.6},{:.6},{:.6}",
            p.date,
            series.quality.name(),
            fit.model.display_name(),
            p.years,
            p.ppg,
            fitted,
            resid,
        )
        .map_err(|e| AppError::numeric(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write serial-correlation reports as pretty JSON.
pub fn write_tests_json(path: &Path, reports: &[SerialReport]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::numeric(format!("Failed to create tests JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, reports)
        .map_err(|e| AppError::numeric(format!("Failed to write tests JSON: {e}")))?;
    Ok(())
}

/// Write transactions in the ingest schema.
pub fn write_transactions_csv(path: &Path, transactions: &[Transaction]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::numeric(format!("Failed to create sample CSV '{}': {e}", path.display())))?;

    writeln!(file, "quality,date,ppg")
        .map_err(|e| AppError::numeric(format!("Failed to write sample CSV header: {e}")))?;
    for tx in transactions {
        writeln!(file, "{},{},{:.4}", tx.quality.name(), tx.date, tx.ppg)
            .map_err(|e| AppError::numeric(format!("Failed to write sample CSV row: {e}")))?;
    }

    Ok(())
}
