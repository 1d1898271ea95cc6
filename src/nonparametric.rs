//! Rank-based tests: Mann-Whitney U and Wilcoxon signed-rank.
//!
//! Both use the large-sample normal approximation with tie correction, plus
//! a continuity correction for Mann-Whitney. Exact small-sample enumeration
//! is deliberately out of scope; the approximation is the form the pipeline
//! has always reported.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dist::norm_cdf;

/// A rank-test statistic with its two-sided p-value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankTest {
    pub statistic: f64,
    pub p_value: f64,
}

fn nan_result() -> RankTest {
    RankTest {
        statistic: f64::NAN,
        p_value: f64::NAN,
    }
}

/// Two-sided Mann-Whitney U test. The statistic is U for the first sample.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> RankTest {
    let n1 = a.len();
    let n2 = b.len();
    if n1 == 0 || n2 == 0 {
        return nan_result();
    }

    let mut combined: Vec<(f64, usize)> = Vec::with_capacity(n1 + n2);
    combined.extend(a.iter().map(|&v| (v, 0)));
    combined.extend(b.iter().map(|&v| (v, 1)));
    combined.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));

    let ranks = average_ranks(&combined);
    let r1: f64 = combined
        .iter()
        .zip(ranks.iter())
        .filter(|((_, g), _)| *g == 0)
        .map(|(_, &r)| r)
        .sum();

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let nf = (n1 + n2) as f64;
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;

    let mu = n1f * n2f / 2.0;
    let ties = tie_correction(&combined);
    let sigma_sq = n1f * n2f / 12.0 * (nf + 1.0 - ties / (nf * (nf - 1.0)));
    if sigma_sq <= 0.0 {
        // Every observation tied: no ordering information.
        return RankTest {
            statistic: u1,
            p_value: 1.0,
        };
    }

    // Continuity correction toward the mean.
    let diff = u1 - mu;
    let z = (diff.abs() - 0.5).max(0.0) / sigma_sq.sqrt();
    RankTest {
        statistic: u1,
        p_value: (2.0 * (1.0 - norm_cdf(z))).clamp(0.0, 1.0),
    }
}

/// Two-sided Wilcoxon signed-rank test on paired samples. Zero differences
/// are discarded; the statistic is T+, the sum of positive-difference ranks.
pub fn wilcoxon_signed_rank(pre: &[f64], post: &[f64]) -> RankTest {
    if pre.len() != post.len() {
        return nan_result();
    }
    let diffs: Vec<f64> = post
        .iter()
        .zip(pre.iter())
        .map(|(p, q)| p - q)
        .filter(|d| *d != 0.0)
        .collect();
    let n = diffs.len();
    if n < 2 {
        return nan_result();
    }

    let mut by_abs: Vec<(f64, usize)> = diffs.iter().map(|d| d.abs()).zip(0..).collect();
    by_abs.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));
    let ranks = average_ranks(&by_abs);

    let t_plus: f64 = by_abs
        .iter()
        .zip(ranks.iter())
        .filter(|((_, idx), _)| diffs[*idx] > 0.0)
        .map(|(_, &r)| r)
        .sum();

    let nf = n as f64;
    let mu = nf * (nf + 1.0) / 4.0;
    let ties = tie_correction(&by_abs);
    let sigma_sq = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ties / 48.0;
    if sigma_sq <= 0.0 {
        return RankTest {
            statistic: t_plus,
            p_value: 1.0,
        };
    }

    let z = (t_plus - mu) / sigma_sq.sqrt();
    RankTest {
        statistic: t_plus,
        p_value: (2.0 * (1.0 - norm_cdf(z.abs()))).clamp(0.0, 1.0),
    }
}

// Average ranks over sorted (value, tag) pairs, ties sharing their mean rank.
fn average_ranks(sorted: &[(f64, usize)]) -> Vec<f64> {
    let n = sorted.len();
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j].0 == sorted[i].0 {
            j += 1;
        }
        let avg = (i + 1 + j) as f64 / 2.0;
        for r in ranks.iter_mut().take(j).skip(i) {
            *r = avg;
        }
        i = j;
    }
    ranks
}

// Sum of t(t^2 - 1) over tie groups, for the variance correction.
fn tie_correction(sorted: &[(f64, usize)]) -> f64 {
    let n = sorted.len();
    let mut total = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j].0 == sorted[i].0 {
            j += 1;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            total += t * (t * t - 1.0);
        }
        i = j;
    }
    total
}
