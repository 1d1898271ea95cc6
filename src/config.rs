//! Analysis-wide configuration, passed by value into each entry point.
//!
//! Every computation is a pure function of the observation table and this
//! structure. Nothing reads ambient global state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning knobs shared by the whole comparison pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Significance level applied independently to every sub-test.
    pub alpha: f64,
    /// Minimum row count before a subgroup is analyzed at all.
    pub min_subgroup_size: usize,
    /// Minimum complete-case total (both arms combined) before a
    /// baseline-adjusted model is fit.
    pub min_adjusted_total: usize,
    /// |d| below this is negligible.
    pub negligible_threshold: f64,
    /// |d| below this is small.
    pub small_threshold: f64,
    /// |d| below this is medium; at or above it, large.
    pub medium_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_subgroup_size: 10,
            min_adjusted_total: 10,
            negligible_threshold: 0.2,
            small_threshold: 0.5,
            medium_threshold: 0.8,
        }
    }
}
