//! Standardized mean differences between two samples.
//!
//! Sign convention throughout: group1 minus group2, where group1 is the
//! first-encountered label in the group column (the treatment arm in the
//! original study layout). Degenerate denominators produce NaN or infinity,
//! reported as data rather than raised as errors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::descriptive::{mean, stddev_sample, variance_sample};

/// Which standardized mean difference to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectSizeMethod {
    CohenD,
    GlassDelta,
    HedgesG,
}

/// Cohen's d with the pooled (n-1) standard deviation. Undefined (NaN or
/// infinite) when n1 + n2 <= 2 or the pooled variance is zero.
pub fn cohen_d(group1: &[f64], group2: &[f64]) -> f64 {
    let n1 = group1.len() as f64;
    let n2 = group2.len() as f64;
    let pooled = (((n1 - 1.0) * variance_sample(group1) + (n2 - 1.0) * variance_sample(group2))
        / (n1 + n2 - 2.0))
        .sqrt();
    (mean(group1) - mean(group2)) / pooled
}

/// Glass's delta: the second sample is the reference standard deviation.
pub fn glass_delta(group1: &[f64], group2: &[f64]) -> f64 {
    (mean(group1) - mean(group2)) / stddev_sample(group2)
}

/// Hedges' g: Cohen's d with the small-sample bias correction
/// 1 - 3 / (4(n1+n2) - 9).
pub fn hedges_g(group1: &[f64], group2: &[f64]) -> f64 {
    let n = (group1.len() + group2.len()) as f64;
    let correction = 1.0 - 3.0 / (4.0 * n - 9.0);
    cohen_d(group1, group2) * correction
}

/// Compute the effect size selected by `method`.
pub fn effect_size(group1: &[f64], group2: &[f64], method: EffectSizeMethod) -> f64 {
    match method {
        EffectSizeMethod::CohenD => cohen_d(group1, group2),
        EffectSizeMethod::GlassDelta => glass_delta(group1, group2),
        EffectSizeMethod::HedgesG => hedges_g(group1, group2),
    }
}

/// Conventional magnitude bands for a standardized mean difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EffectMagnitude::Negligible => "Negligible",
            EffectMagnitude::Small => "Small",
            EffectMagnitude::Medium => "Medium",
            EffectMagnitude::Large => "Large",
        };
        f.write_str(label)
    }
}

/// Band |d| against the configured thresholds.
pub fn interpret_effect_size(d: f64, config: &AnalysisConfig) -> EffectMagnitude {
    let abs_d = d.abs();
    if abs_d < config.negligible_threshold {
        EffectMagnitude::Negligible
    } else if abs_d < config.small_threshold {
        EffectMagnitude::Small
    } else if abs_d < config.medium_threshold {
        EffectMagnitude::Medium
    } else {
        EffectMagnitude::Large
    }
}
