//! Per-group descriptive summaries and the scalar statistics under them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dist::t_critical;
use crate::error::StatsError;
use crate::table::ObservationTable;

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Unbiased sample variance (n-1 denominator). NaN for n < 2.
pub fn variance_sample(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / ((n as f64) - 1.0)
}

/// Unbiased sample standard deviation (n-1 denominator). NaN for n < 2.
pub fn stddev_sample(xs: &[f64]) -> f64 {
    variance_sample(xs).sqrt()
}

/// Quantile with linear interpolation between order statistics
/// (the convention the export tables were originally built with).
pub fn quantile(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let h = q * ((sorted.len() - 1) as f64);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

pub fn median(xs: &[f64]) -> f64 {
    quantile(xs, 0.5)
}

/// Fixed descriptive record for one group's present values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupSummary {
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize one sample. An empty sample yields n = 0 and NaN everywhere
/// else; this is not an error.
pub fn summarize(xs: &[f64]) -> GroupSummary {
    GroupSummary {
        n: xs.len(),
        mean: mean(xs),
        std: stddev_sample(xs),
        median: median(xs),
        q25: quantile(xs, 0.25),
        q75: quantile(xs, 0.75),
        min: xs.iter().copied().fold(f64::NAN, f64::min),
        max: xs.iter().copied().fold(f64::NAN, f64::max),
    }
}

/// Descriptive statistics for every distinct group in `group_col`,
/// in first-encounter order, over present outcome values only.
pub fn descriptive_stats(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
) -> Result<Vec<(String, GroupSummary)>, StatsError> {
    let mut out = Vec::new();
    for label in table.levels(group_col)? {
        let values = table.values_where(group_col, &label, outcome_col)?;
        out.push((label, summarize(&values)));
    }
    Ok(out)
}

/// t-based confidence interval for the mean of `xs`. Non-finite values are
/// dropped first; fewer than two usable values yields (NaN, NaN).
pub fn confidence_interval(xs: &[f64], confidence: f64) -> (f64, f64) {
    let clean: Vec<f64> = xs.iter().copied().filter(|v| v.is_finite()).collect();
    if clean.len() < 2 {
        return (f64::NAN, f64::NAN);
    }
    let n = clean.len() as f64;
    let m = mean(&clean);
    let sem = stddev_sample(&clean) / n.sqrt();
    let margin = t_critical(n - 1.0, confidence) * sem;
    (m - margin, m + margin)
}
