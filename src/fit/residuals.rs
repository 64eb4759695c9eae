//! Residual percentiles over time.
//!
//! Observations are binned by `years` into equal-width bins; the first and
//! last occupied bins are dropped because they are usually sparse. Each
//! remaining bin contributes one point per percentile line: the mean `years`
//! of the bin and the residual percentile within it.

use std::collections::BTreeMap;

use crate::math::{linspace, mean, percentile};

/// Default number of bin edges.
pub const RESIDUAL_BINS: usize = 20;
/// Percentile lines drawn on the residual chart.
pub const RESIDUAL_PERCENTS: [f64; 3] = [75.0, 50.0, 25.0];

/// One percentile line.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileLine {
    pub percent: f64,
    /// `(mean years, residual percentile)` per retained bin.
    pub points: Vec<(f64, f64)>,
}

/// Bin residuals by `xs` and compute percentile lines.
pub fn residual_percentiles(
    xs: &[f64],
    residuals: &[f64],
    num_bins: usize,
    percents: &[f64],
) -> Vec<PercentileLine> {
    let groups = bin_by(xs, residuals, num_bins);

    // Drop the first and last groups.
    let inner: Vec<&(Vec<f64>, Vec<f64>)> = if groups.len() > 2 {
        groups.values().skip(1).take(groups.len() - 2).collect()
    } else {
        Vec::new()
    };

    percents
        .iter()
        .map(|&percent| PercentileLine {
            percent,
            points: inner
                .iter()
                .filter_map(|(gx, gr)| Some((mean(gx)?, percentile(gr, percent)?)))
                .collect(),
        })
        .collect()
}

/// Group `(x, r)` pairs by bin index, where the index of `x` is the number of
/// bin edges `<= x`.
fn bin_by(xs: &[f64], residuals: &[f64], num_bins: usize) -> BTreeMap<usize, (Vec<f64>, Vec<f64>)> {
    let mut groups: BTreeMap<usize, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    let (Some(lo), Some(hi)) = (
        xs.iter().copied().reduce(f64::min),
        xs.iter().copied().reduce(f64::max),
    ) else {
        return groups;
    };
    let edges = linspace(lo, hi, num_bins);

    for (&x, &r) in xs.iter().zip(residuals) {
        let idx = edges.partition_point(|&e| e <= x);
        let entry = groups.entry(idx).or_default();
        entry.0.push(x);
        entry.1.push(r);
    }
    groups
}
