//! CSV ingest of price transactions.
//!
//! This module is responsible for turning a transaction CSV into a clean set of
//! `(quality, date, ppg)` records that are safe to group and fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no grouping or fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Quality, Transaction};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 3] = ["quality", "date", "ppg"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed transactions plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub transactions: Vec<Transaction>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load transactions from a CSV file.
pub fn load_transactions(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_transactions(file)?;

    tracing::info!(
        path = %path.display(),
        rows_read = data.rows_read,
        rows_used = data.transactions.len(),
        rows_skipped = data.row_errors.len(),
        "loaded transactions"
    );
    Ok(data)
}

/// Parse transactions from any CSV source.
pub fn read_transactions<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::input(format!("Missing required column: `{column}`")));
        }
    }

    let mut transactions = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &header_map));
        match parsed {
            Ok(tx) => transactions.push(tx),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        tracing::warn!(count = row_errors.len(), "skipped invalid CSV rows");
    }
    if transactions.is_empty() {
        return Err(AppError::insufficient_data(
            "No valid transactions remain after parsing.",
        ));
    }

    Ok(IngestedData {
        transactions,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Transaction, String> {
    let raw_quality = get_required(record, header_map, "quality")?;
    let quality = Quality::parse(raw_quality)
        .ok_or_else(|| format!("Unknown quality '{raw_quality}'."))?;

    let date = parse_date(get_required(record, header_map, "date")?)?;

    let raw_ppg = get_required(record, header_map, "ppg")?;
    let ppg = raw_ppg
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid ppg '{raw_ppg}'."))?;

    Ok(Transaction { quality, date, ppg })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Dates may carry a time part (`2010-09-02 00:00:00`); only the day matters.
    let day = s.split([' ', 'T']).next().unwrap_or(s);
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(day, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}city,state,price,amount,quality,date,ppg\n\
        Annandale,VA,100,7.075,high,2010-09-02,14.13\n\
        Auburn,AL,60,28.3,high,2010-09-02 00:00:00,2.12\n\
        Austin,TX,60,28.3,medium,2010-09-03,2.12\n\
        Bad,XX,1,1,premium,2010-09-03,1.0\n\
        Bad,XX,1,1,low,not-a-date,1.0\n\
        Bad,XX,1,1,low,2010-09-04,\n";

    #[test]
    fn parses_valid_rows_and_collects_errors() {
        let data = read_transactions(SAMPLE.as_bytes()).unwrap();

        assert_eq!(data.rows_read, 6);
        assert_eq!(data.transactions.len(), 3);
        assert_eq!(data.row_errors.len(), 3);
        assert_eq!(data.row_errors[0].line, 5);

        let first = &data.transactions[0];
        assert_eq!(first.quality, Quality::High);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2010, 9, 2).unwrap());
        assert!((first.ppg - 14.13).abs() < 1e-12);
        assert_eq!(data.transactions[1].date, first.date);
    }

    #[test]
    fn missing_column_is_a_config_error() {
        let err = read_transactions("quality,date\nhigh,2010-09-02\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("ppg"));
    }

    #[test]
    fn no_valid_rows_is_insufficient_data() {
        let err = read_transactions("quality,date,ppg\nhigh,bad,1\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn quality_is_case_insensitive() {
        let data = read_transactions("QUALITY,Date,PPG\nHigh,2011-01-05,9.5\n".as_bytes()).unwrap();
        assert_eq!(data.transactions[0].quality, Quality::High);
    }
}
