//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::DailySeries;
use crate::fit::RegressionFit;
use crate::hypothesis::SerialReport;

/// Header describing the analysed group.
pub fn format_series_header(series: &DailySeries) -> String {
    let mut out = String::new();
    out.push_str("=== ppg - daily price trend ===\n");
    out.push_str(&format!("Quality: {}\n", series.quality.name()));
    if let (Some(first), Some(last)) = (series.points.first(), series.points.last()) {
        out.push_str(&format!(
            "Days: n={} | {} .. {} | years=[0, {:.3}]\n",
            series.len(),
            first.date,
            last.date,
            last.years,
        ));
    }
    out
}

/// Coefficient table plus fit statistics for one model.
///
/// Each coefficient is printed as `name   value   (p-value)` to three
/// significant digits, followed by R², the population std of the response,
/// and the sample std of the residuals.
pub fn format_fit_summary(fit: &RegressionFit) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nModel: {}\n", fit.model.formula()));
    for c in &fit.coefficients {
        out.push_str(&format!(
            "{:<10}   {}   ({})\n",
            c.name,
            fmt_sig(c.value, 3),
            fmt_sig(c.p_value, 3)
        ));
    }
    out.push_str(&format!("R^2 {}\n", fmt_sig(fit.quality.r_squared, 4)));
    out.push_str(&format!("Std(ys) {}\n", fmt_sig(fit.quality.std_ys, 4)));
    out.push_str(&format!("Std(res) {}\n", fmt_sig(fit.quality.std_resid, 4)));
    out
}

/// One line per serial-correlation test, in report order.
pub fn format_serial_reports(reports: &[SerialReport]) -> String {
    let mut out = String::new();
    let Some(first) = reports.first() else {
        return out;
    };

    out.push_str(&format!(
        "\nSerial correlation (lag {}, {} permutations):\n",
        first.lag, first.iters
    ));
    out.push_str(&format!(
        "{:<16} {:>10} {:>10} {:>10}\n",
        "series", "actual", "p-value", "max(sim)"
    ));
    out.push_str(&format!("{:-<16} {:-<10} {:-<10} {:-<10}\n", "", "", "", ""));
    for r in reports {
        out.push_str(&format!(
            "{:<16} {:>10.6} {:>10.4} {:>10.6}\n",
            r.target.display_name(),
            r.outcome.actual,
            r.outcome.p_value,
            r.outcome.max_test_stat(),
        ));
    }
    out
}

/// Format with `digits` significant digits, switching to exponent notation
/// for very small or very large magnitudes.
pub fn fmt_sig(v: f64, digits: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    // Exponent after rounding, so 999.7 at 3 digits becomes 1e3.
    let sci = format!("{:.*e}", digits - 1, v);
    let Some((mantissa, exp)) = sci
        .split_once('e')
        .and_then(|(m, e)| Some((m, e.parse::<i32>().ok()?)))
    else {
        return sci;
    };
    if exp < -4 || exp >= digits as i32 {
        format!("{}e{exp}", trim_zeros(mantissa))
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Quality, SerialTarget};
    use crate::fit::run_quadratic_model;
    use crate::hypothesis::TestOutcome;

    #[test]
    fn significant_digit_formatting() {
        assert_eq!(fmt_sig(13.4567, 3), "13.5");
        assert_eq!(fmt_sig(-0.0071234, 3), "-0.00712");
        assert_eq!(fmt_sig(2.0, 3), "2");
        assert_eq!(fmt_sig(0.000012345, 3), "1.23e-5");
        assert_eq!(fmt_sig(123456.0, 3), "1.23e5");
        assert_eq!(fmt_sig(0.0, 3), "0");
        assert_eq!(fmt_sig(f64::NAN, 3), "NaN");
    }

    #[test]
    fn rounding_carry_moves_the_exponent() {
        assert_eq!(fmt_sig(999.7, 3), "1e3");
        assert_eq!(fmt_sig(0.00009996, 3), "0.0001");
        assert_eq!(fmt_sig(9.9996, 4), "10");
    }

    #[test]
    fn fit_summary_lists_every_coefficient() {
        let years: Vec<f64> = (0..20).map(|i| i as f64 * 0.2).collect();
        let ppg: Vec<f64> = years
            .iter()
            .enumerate()
            .map(|(i, t)| 2.0 + 3.0 * t + 0.5 * t * t + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let series = DailySeries::from_years(Quality::High, &years, &ppg);
        let (_, fit) = run_quadratic_model(&series).unwrap();

        let text = format_fit_summary(&fit);
        assert!(text.contains("ppg ~ years + years2"));
        assert!(text.contains("Intercept"));
        assert!(text.contains("years2"));
        assert!(text.contains("R^2 "));
        assert!(text.contains("Std(res) "));
    }

    #[test]
    fn serial_reports_one_line_each() {
        let reports: Vec<SerialReport> = SerialTarget::ALL
            .iter()
            .map(|&target| SerialReport {
                target,
                lag: 1,
                iters: 3,
                outcome: TestOutcome {
                    actual: 0.5,
                    p_value: 0.0,
                    test_stats: vec![0.1, 0.2, 0.3],
                },
            })
            .collect();

        let text = format_serial_reports(&reports);
        let lines: Vec<&str> = text.trim().lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("lag 1, 3 permutations"));
        assert!(lines[3].starts_with("price"));
        assert!(lines[4].starts_with("linear resid"));
        assert!(lines[5].starts_with("quadratic resid"));
        assert!(lines[5].contains("0.300000"));
    }
}
