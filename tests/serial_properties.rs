//! Property-based tests for the serial-correlation test.
//!
//! Properties covered:
//! 1. The statistic is deterministic and lies in [0, 1]
//! 2. p-values lie in [0, 1] for any iteration count
//! 3. The null model only reorders values
//! 4. Series too short for the lag are degenerate (statistic 0, p-value 1)
//! 5. White noise yields p-values spread around 0.5 across seeds

use ppg_trend::hypothesis::{SerialData, permute_series, serial_corr_statistic, serial_correlation_test};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

fn sorted(mut xs: Vec<f64>) -> Vec<f64> {
    xs.sort_by(f64::total_cmp);
    xs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_statistic_in_unit_interval(
        series in prop::collection::vec(-1.0e3f64..1.0e3, 0..60),
        lag in 1usize..5,
    ) {
        let data = SerialData { series, lag };
        let stat = serial_corr_statistic(&data);
        prop_assert!((0.0..=1.0).contains(&stat));
        prop_assert_eq!(stat, serial_corr_statistic(&data));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_p_value_in_unit_interval(
        series in prop::collection::vec(-50.0f64..50.0, 0..40),
        lag in 1usize..4,
        iters in 1usize..40,
        seed in any::<u64>(),
    ) {
        let outcome = serial_correlation_test(&series, lag, iters, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!((0.0..=1.0).contains(&outcome.p_value));
        prop_assert_eq!(outcome.iters(), iters);
    }

    #[test]
    fn prop_permutation_preserves_values(
        series in prop::collection::vec(-50.0f64..50.0, 0..40),
        seed in any::<u64>(),
    ) {
        let data = SerialData { series: series.clone(), lag: 1 };
        let shuffled = permute_series(&data, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(shuffled.lag, 1);
        prop_assert_eq!(sorted(shuffled.series), sorted(series));
    }

    #[test]
    fn prop_short_series_are_degenerate(
        lag in 1usize..6,
        extra in 0usize..2,
        seed in any::<u64>(),
    ) {
        // len <= lag + 1 leaves fewer than two lagged pairs.
        let len = (lag + extra).min(lag + 1);
        let series: Vec<f64> = (0..len).map(|i| i as f64 * 1.5).collect();
        let outcome = serial_correlation_test(&series, lag, 25, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(outcome.actual, 0.0);
        prop_assert_eq!(outcome.p_value, 1.0);
    }
}

#[test]
fn white_noise_p_values_are_not_extreme_on_average() {
    let mut total = 0.0;
    let seeds = 20u64;
    for seed in 0..seeds {
        let mut rng = StdRng::seed_from_u64(1000 + seed);
        let series: Vec<f64> = (0..200).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let outcome = serial_correlation_test(&series, 1, 200, &mut rng).unwrap();
        total += outcome.p_value;
    }
    let mean = total / seeds as f64;
    assert!((0.2..0.8).contains(&mean), "mean p-value {mean}");
}
