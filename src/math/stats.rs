//! Descriptive statistics on plain `f64` slices.

/// Arithmetic mean (`None` for an empty slice).
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample).
pub fn variance(xs: &[f64], ddof: usize) -> Option<f64> {
    let m = mean(xs)?;
    if xs.len() <= ddof {
        return None;
    }
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Some(ss / (xs.len() - ddof) as f64)
}

pub fn std_dev(xs: &[f64], ddof: usize) -> Option<f64> {
    variance(xs, ddof).map(f64::sqrt)
}

/// Pearson correlation.
///
/// `None` when the inputs differ in length, have fewer than two pairs, or either
/// side has zero variance.
pub fn pearson_corr(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx <= 0.0 || vy <= 0.0 {
        return None;
    }
    let corr = cov / (vx * vy).sqrt();
    corr.is_finite().then(|| corr.clamp(-1.0, 1.0))
}

/// Correlation between a series and itself shifted by `lag`.
///
/// Element `t` is paired with element `t - lag`; the first `lag` elements have
/// no partner and are dropped.
pub fn serial_corr(series: &[f64], lag: usize) -> Option<f64> {
    if series.len() <= lag {
        return None;
    }
    let current = &series[lag..];
    let lagged = &series[..series.len() - lag];
    pearson_corr(current, lagged)
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Value at percentile `p` (0–100) of an empirical CDF.
///
/// Returns the smallest value `x` whose cumulative probability is `>= p / 100`.
/// `sorted` must be ascending.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len() as f64;
    let target = (p / 100.0).clamp(0.0, 1.0);
    let idx = sorted
        .iter()
        .enumerate()
        .position(|(i, _)| (i + 1) as f64 / n >= target)
        .unwrap_or(sorted.len() - 1);
    Some(sorted[idx])
}

/// Percentile of an unsorted sample (see [`percentile_sorted`]).
pub fn percentile(xs: &[f64], p: f64) -> Option<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, p)
}

/// Column-wise percentile rows of a set of equal-length rows.
///
/// Each column is sorted independently and the row at index
/// `floor(n_rows * p / 100)` is taken.
pub fn percentile_rows(rows: &[Vec<f64>], percents: &[f64]) -> Vec<Vec<f64>> {
    let Some(first) = rows.first() else {
        return percents.iter().map(|_| Vec::new()).collect();
    };
    let n_rows = rows.len();
    let n_cols = first.len();

    let columns: Vec<Vec<f64>> = (0..n_cols)
        .map(|j| {
            let mut col: Vec<f64> = rows.iter().map(|r| r[j]).collect();
            col.sort_by(|a, b| a.total_cmp(b));
            col
        })
        .collect();

    percents
        .iter()
        .map(|&p| {
            let idx = ((n_rows as f64 * p / 100.0) as usize).min(n_rows - 1);
            columns.iter().map(|col| col[idx]).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&xs), Some(2.5));
        assert!((variance(&xs, 0).unwrap() - 1.25).abs() < 1e-12);
        assert!((variance(&xs, 1).unwrap() - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(mean(&[]), None);
        assert_eq!(variance(&[1.0], 1), None);
    }

    #[test]
    fn pearson_of_perfect_lines() {
        let xs = [1.0, 2.0, 3.0];
        assert!((pearson_corr(&xs, &[2.0, 4.0, 6.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson_corr(&xs, &[3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_undefined_for_constant_input() {
        assert_eq!(pearson_corr(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson_corr(&[1.0], &[1.0]), None);
    }

    #[test]
    fn serial_corr_of_alternating_series_is_negative() {
        let xs = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert!((serial_corr(&xs, 1).unwrap() + 1.0).abs() < 1e-12);
        assert!((serial_corr(&xs, 2).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn serial_corr_degenerate_lengths() {
        assert_eq!(serial_corr(&[1.0, 2.0], 2), None);
        assert_eq!(serial_corr(&[1.0, 2.0], 1), None);
        assert_eq!(serial_corr(&[], 1), None);
    }

    #[test]
    fn linspace_endpoints() {
        let grid = linspace(0.0, 5.0, 101);
        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 0.0);
        assert!((grid[100] - 5.0).abs() < 1e-12);
        assert!((grid[1] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn percentile_uses_cdf_inverse() {
        let xs = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&xs, 50.0), Some(2.0));
        assert_eq!(percentile(&xs, 75.0), Some(3.0));
        assert_eq!(percentile(&xs, 76.0), Some(4.0));
        assert_eq!(percentile(&xs, 0.0), Some(1.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn percentile_rows_by_column() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 30.0], vec![2.0, 20.0], vec![4.0, 40.0]];
        let out = percentile_rows(&rows, &[5.0, 95.0]);
        assert_eq!(out[0], vec![1.0, 10.0]);
        assert_eq!(out[1], vec![4.0, 40.0]);
    }
}
