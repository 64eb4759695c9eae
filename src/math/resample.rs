//! Seeded resampling helpers shared by the permutation test and the bootstrap.
//!
//! Parallel loops never share a generator. Instead the caller's generator
//! draws one seed per iteration up front and every iteration builds its own
//! `StdRng` from that seed, so results do not depend on thread scheduling.

use rand::prelude::*;
use rand::rngs::StdRng;

/// Draw `n` per-iteration seeds from `rng`.
pub fn iteration_seeds<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.next_u64()).collect()
}

/// Generator for one iteration.
pub fn iteration_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Sample `n` values from `xs` with replacement (empty if `xs` is empty).
pub fn resample<R: Rng + ?Sized>(xs: &[f64], n: usize, rng: &mut R) -> Vec<f64> {
    if xs.is_empty() {
        return Vec::new();
    }
    (0..n).map(|_| xs[rng.gen_range(0..xs.len())]).collect()
}

/// Values of `xs` in a uniformly random order.
pub fn permute<R: Rng + ?Sized>(xs: &[f64], rng: &mut R) -> Vec<f64> {
    let mut out = xs.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_reproducible() {
        let a = iteration_seeds(&mut StdRng::seed_from_u64(7), 5);
        let b = iteration_seeds(&mut StdRng::seed_from_u64(7), 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn resample_draws_from_input() {
        let xs = [1.0, 2.0, 3.0];
        let mut rng = StdRng::seed_from_u64(1);
        let out = resample(&xs, 50, &mut rng);
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|v| xs.contains(v)));
        assert!(resample(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn permute_keeps_values() {
        let xs: Vec<f64> = (0..20).map(f64::from).collect();
        let mut out = permute(&xs, &mut StdRng::seed_from_u64(3));
        out.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(out, xs);
    }
}
