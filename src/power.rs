//! Analytic power for the two-sided two-sample comparison.
//!
//! Closed-form normal approximation: with per-group size n and effect d,
//! the test statistic is approximately N(d * sqrt(n/2), 1), so
//! power = 1 - [Phi(z_a - z) - Phi(-z_a - z)] with z = |d| * sqrt(n/2).
//! At d = 0 this degenerates to alpha, as it should.

use crate::dist::{norm_cdf, norm_inv_cdf};

/// Statistical power for a two-sided two-sample t-test at the given effect
/// size (treated as unsigned), per-group sample size, and alpha. Clamped to
/// [0, 1]; invalid alpha or a zero sample size yields 0.
pub fn power_two_sample_t(effect_size: f64, n_per_group: usize, alpha: f64) -> f64 {
    if !(0.0..1.0).contains(&alpha) || alpha == 0.0 || n_per_group == 0 {
        return 0.0;
    }
    let d = effect_size.abs();
    if d.is_nan() {
        return f64::NAN;
    }
    let z_alpha = norm_inv_cdf(1.0 - alpha / 2.0);
    let z = d * ((n_per_group as f64) / 2.0).sqrt();
    let beta = norm_cdf(z_alpha - z) - norm_cdf(-z_alpha - z);
    (1.0 - beta).clamp(0.0, 1.0)
}

/// Smallest per-group sample size whose approximate power reaches
/// `target_power`. Returns 0 when the inputs make the target unreachable.
pub fn sample_size_two_sample_t(effect_size: f64, alpha: f64, target_power: f64) -> usize {
    if effect_size.abs() <= 0.0
        || !(0.0..1.0).contains(&alpha)
        || alpha == 0.0
        || !(0.0..=1.0).contains(&target_power)
    {
        return 0;
    }
    let mut n = 2usize;
    loop {
        if power_two_sample_t(effect_size, n, alpha) >= target_power {
            return n;
        }
        n += 1;
        if n > 100_000 {
            return 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn power_is_monotone_in_sample_size() {
        let mut last = 0.0;
        for n in [5, 10, 20, 40, 80, 160] {
            let p = power_two_sample_t(0.5, n, 0.05);
            assert!(p >= last, "power dropped at n = {n}");
            last = p;
        }
    }

    #[test]
    fn null_effect_power_is_alpha() {
        assert_abs_diff_eq!(power_two_sample_t(0.0, 50, 0.05), 0.05, epsilon = 1e-10);
    }

    #[test]
    fn medium_effect_benchmark() {
        // d = 0.5 at n = 64/group is the textbook ~80% design.
        let p = power_two_sample_t(0.5, 64, 0.05);
        assert_abs_diff_eq!(p, 0.80, epsilon = 0.02);
    }

    #[test]
    fn sign_of_effect_is_ignored() {
        assert_abs_diff_eq!(
            power_two_sample_t(-0.7, 30, 0.05),
            power_two_sample_t(0.7, 30, 0.05),
            epsilon = 1e-12
        );
    }

    #[test]
    fn sample_size_search_meets_target() {
        let n = sample_size_two_sample_t(0.5, 0.05, 0.80);
        assert!((55..=70).contains(&n), "n = {n}");
        assert!(power_two_sample_t(0.5, n, 0.05) >= 0.80);
        assert!(power_two_sample_t(0.5, n - 1, 0.05) < 0.80);
    }

    #[test]
    fn invalid_inputs_yield_zero() {
        assert_eq!(power_two_sample_t(0.5, 0, 0.05), 0.0);
        assert_eq!(power_two_sample_t(0.5, 10, 0.0), 0.0);
        assert_eq!(sample_size_two_sample_t(0.0, 0.05, 0.8), 0);
    }
}
