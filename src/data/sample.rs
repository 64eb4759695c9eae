//! Synthetic transaction generation.
//!
//! Produces a transaction set with the same shape as the real price data so
//! the pipeline can run without it:
//!
//! - a quadratic price trend per quality grade (prices fall, then flatten)
//! - AR(1) day-to-day deviations around the trend
//! - a Poisson number of transactions per day (some days have none)
//! - per-transaction jitter around the day's price

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::Duration;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Poisson};

use crate::domain::{DAYS_PER_YEAR, Quality, SampleConfig, Transaction};
use crate::error::AppError;

/// Autocorrelation of the daily deviation from trend.
const AR_COEF: f64 = 0.5;

/// Trend and noise parameters for one quality grade.
#[derive(Debug, Clone, Copy)]
struct GradeProfile {
    intercept: f64,
    slope: f64,
    curvature: f64,
    /// Std dev of the AR(1) innovation.
    daily_sigma: f64,
    /// Std dev of a single transaction around the day's price.
    tx_sigma: f64,
}

fn profile(quality: Quality) -> GradeProfile {
    match quality {
        Quality::High => GradeProfile {
            intercept: 13.5,
            slope: -1.2,
            curvature: 0.15,
            daily_sigma: 0.35,
            tx_sigma: 2.5,
        },
        Quality::Medium => GradeProfile {
            intercept: 10.0,
            slope: -0.4,
            curvature: 0.05,
            daily_sigma: 0.3,
            tx_sigma: 2.2,
        },
        Quality::Low => GradeProfile {
            intercept: 5.5,
            slope: 0.1,
            curvature: -0.02,
            daily_sigma: 0.25,
            tx_sigma: 1.8,
        },
    }
}

/// Generate transactions for every quality grade.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Transaction>, AppError> {
    if config.days == 0 {
        return Err(AppError::input("Sample days must be > 0."));
    }
    if !(config.per_day.is_finite() && config.per_day > 0.0) {
        return Err(AppError::input("Transactions per day must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let arrivals = Poisson::new(config.per_day)
        .map_err(|e| AppError::input(format!("Arrival distribution error: {e}")))?;
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))?;

    let mut transactions = Vec::new();
    for quality in Quality::ALL {
        let grade = profile(quality);
        let mut deviation = 0.0;

        for day in 0..config.days {
            let years = day as f64 / DAYS_PER_YEAR;
            let trend = grade.intercept + grade.slope * years + grade.curvature * years * years;
            deviation = AR_COEF * deviation + grade.daily_sigma * standard.sample(&mut rng);
            let day_price = trend + deviation;

            let date = config.start + Duration::days(day as i64);
            let count = arrivals.sample(&mut rng) as usize;
            for _ in 0..count {
                let jitter = grade.tx_sigma * standard.sample(&mut rng);
                // Prices stay positive; a floor keeps the tail from crossing zero.
                let ppg = (day_price + jitter).max(0.25);
                transactions.push(Transaction { quality, date, ppg });
            }
        }
    }

    tracing::info!(
        days = config.days,
        transactions = transactions.len(),
        "generated synthetic transactions"
    );
    Ok(transactions)
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.start.hash(&mut hasher);
    config.days.hash(&mut hasher);
    config.per_day.to_bits().hash(&mut hasher);
    config.seed.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::grouping::group_by_quality_and_day;
    use crate::fit::run_quadratic_model;
    use chrono::NaiveDate;

    fn config(seed: u64) -> SampleConfig {
        SampleConfig {
            start: NaiveDate::from_ymd_opt(2010, 9, 2).unwrap(),
            days: 400,
            per_day: 3.0,
            seed,
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let a = generate_sample(&config(1)).unwrap();
        let b = generate_sample(&config(1)).unwrap();
        let c = generate_sample(&config(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sample_covers_all_grades_with_positive_prices() {
        let txs = generate_sample(&config(7)).unwrap();
        assert!(txs.iter().all(|t| t.ppg > 0.0));

        let dailies = group_by_quality_and_day(&txs);
        assert_eq!(dailies.len(), 3);
        // ~95% of days have at least one transaction at 3/day.
        assert!(dailies[&Quality::High].len() > 350);
    }

    #[test]
    fn high_grade_trend_is_recoverable() {
        let txs = generate_sample(&SampleConfig {
            days: 1200,
            ..config(3)
        })
        .unwrap();
        let dailies = group_by_quality_and_day(&txs);
        let (_, fit) = run_quadratic_model(&dailies[&Quality::High]).unwrap();

        assert!((fit.betas[0] - 13.5).abs() < 1.0, "intercept {}", fit.betas[0]);
        assert!(fit.betas[1] < 0.0);
    }

    #[test]
    fn zero_days_rejected() {
        let mut cfg = config(1);
        cfg.days = 0;
        assert_eq!(generate_sample(&cfg).unwrap_err().exit_code(), 2);
    }
}
