//! Group transactions into one daily series per quality grade.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DAYS_PER_YEAR, DailyPoint, DailySeries, Quality, Transaction};
use crate::error::AppError;

/// Daily series keyed by quality.
pub type Dailies = BTreeMap<Quality, DailySeries>;

/// Partition by quality, then average ppg per day.
pub fn group_by_quality_and_day(transactions: &[Transaction]) -> Dailies {
    let mut by_quality: BTreeMap<Quality, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        by_quality.entry(tx.quality).or_default().push(tx);
    }

    by_quality
        .into_iter()
        .map(|(quality, txs)| (quality, group_by_day(quality, &txs)))
        .collect()
}

/// Average ppg per calendar day; `years` is measured from the first day.
pub fn group_by_day(quality: Quality, transactions: &[&Transaction]) -> DailySeries {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for tx in transactions {
        let entry = days.entry(tx.date).or_insert((0.0, 0));
        entry.0 += tx.ppg;
        entry.1 += 1;
    }

    let start = days.keys().next().copied();
    let points = days
        .into_iter()
        .map(|(date, (sum, count))| {
            let elapsed = start.map(|s| (date - s).num_days()).unwrap_or(0);
            DailyPoint {
                date,
                years: elapsed as f64 / DAYS_PER_YEAR,
                ppg: sum / count as f64,
            }
        })
        .collect();

    DailySeries { quality, points }
}

/// Pick one quality group.
pub fn select_group(dailies: &Dailies, quality: Quality) -> Result<&DailySeries, AppError> {
    dailies
        .get(&quality)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::insufficient_data(format!(
                "No transactions for quality '{}'.",
                quality.name()
            ))
        })
}
