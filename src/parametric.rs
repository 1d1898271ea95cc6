//! t-tests.
//!
//! The independent comparison is Welch's t-test (unequal variances,
//! Welch-Satterthwaite degrees of freedom) rather than the pooled Student
//! form: it costs nothing when variances happen to be equal and stays honest
//! when they are not.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::descriptive::{mean, stddev_sample, variance_sample};
use crate::dist::t_two_sided_p;

/// A t statistic with its degrees of freedom and two-sided p-value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TTest {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
}

/// Welch's two-sample t-test.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> TTest {
    let na = a.len() as f64;
    let nb = b.len() as f64;
    let va = variance_sample(a);
    let vb = variance_sample(b);
    let se2 = va / na + vb / nb;

    let t = if se2 == 0.0 {
        0.0
    } else {
        (mean(a) - mean(b)) / se2.sqrt()
    };

    // Welch-Satterthwaite approximation
    let num = se2.powi(2);
    let den = (va / na).powi(2) / (na - 1.0) + (vb / nb).powi(2) / (nb - 1.0);
    let df = if den == 0.0 { f64::INFINITY } else { num / den };

    TTest {
        statistic: t,
        df,
        p_value: t_two_sided_p(t, df),
    }
}

/// Paired t-test on per-pair differences (post minus pre).
pub fn paired_t_test(pre: &[f64], post: &[f64]) -> TTest {
    if pre.len() != post.len() || pre.len() < 2 {
        return TTest {
            statistic: f64::NAN,
            df: f64::NAN,
            p_value: f64::NAN,
        };
    }
    let diffs: Vec<f64> = post.iter().zip(pre.iter()).map(|(p, q)| p - q).collect();
    let n = diffs.len() as f64;
    let sd = stddev_sample(&diffs);
    let t = mean(&diffs) / (sd / n.sqrt());
    let df = n - 1.0;
    TTest {
        statistic: t,
        df,
        p_value: t_two_sided_p(t, df),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn welch_on_pilot_example() {
        // Equal variances (2.5) and equal n, so se = 1 and df = 8 exactly.
        let ai = [1.0, 2.0, 3.0, 4.0, 5.0];
        let control = [2.0, 3.0, 4.0, 5.0, 6.0];
        let res = welch_t_test(&ai, &control);
        assert_abs_diff_eq!(res.statistic, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(res.df, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(res.p_value, 0.3466, epsilon = 1e-3);
    }

    #[test]
    fn welch_detects_separated_samples() {
        let a = [1.0, 1.2, 0.8, 1.1, 0.9, 1.0];
        let b = [3.0, 3.2, 2.8, 3.1, 2.9, 3.0];
        let res = welch_t_test(&a, &b);
        assert!(res.p_value < 1e-6, "p = {}", res.p_value);
        assert!(res.statistic < 0.0);
    }

    #[test]
    fn paired_t_on_consistent_improvement() {
        let pre = [5.0, 6.0, 7.0, 8.0, 9.0];
        let post = [6.0, 7.5, 8.0, 9.5, 11.0];
        let res = paired_t_test(&pre, &post);
        // diffs [1, 1.5, 1, 1.5, 2]: mean 1.4, sd ~0.4183
        assert_abs_diff_eq!(res.statistic, 7.4833, epsilon = 1e-3);
        assert_abs_diff_eq!(res.df, 4.0, epsilon = 1e-12);
        assert!(res.p_value < 0.01);
    }

    #[test]
    fn paired_t_rejects_mismatched_lengths() {
        let res = paired_t_test(&[1.0, 2.0], &[1.0]);
        assert!(res.statistic.is_nan());
        assert!(res.p_value.is_nan());
    }
}
