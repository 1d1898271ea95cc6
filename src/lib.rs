//! Two-arm study comparison statistics.
//!
//! `trial_stats` implements the fixed analysis battery of a two-arm pilot
//! study: per-group descriptives, the Cohen's d family of effect sizes,
//! Shapiro-Wilk and Levene assumption checks, Welch's t-test and the
//! Mann-Whitney U test with an assumption-driven recommendation, subgroup
//! analysis behind a minimum-size gate, baseline-adjusted (ANCOVA or
//! residual-score) comparison, paired pre/post tests, and analytic power.
//!
//! The input boundary is an in-memory [`ObservationTable`]; loading raw
//! survey exports into one, and rendering result records into tables or
//! figures, belong to external collaborators. Every entry point is a pure
//! function of the table and an explicit [`AnalysisConfig`].
//!
//! ```
//! use trial_stats::{AnalysisConfig, ObservationTable, run_statistical_tests};
//!
//! let mut table = ObservationTable::new(10);
//! table
//!     .add_categorical(
//!         "group",
//!         ["ai", "ai", "ai", "ai", "ai", "control", "control", "control", "control", "control"]
//!             .iter()
//!             .map(|s| Some(s.to_string()))
//!             .collect(),
//!     )
//!     .unwrap();
//! table
//!     .add_numeric(
//!         "self_efficacy_change",
//!         [1.0, 2.0, 3.0, 4.0, 5.0, 2.0, 3.0, 4.0, 5.0, 6.0]
//!             .iter()
//!             .map(|&v| Some(v))
//!             .collect(),
//!     )
//!     .unwrap();
//!
//! let cfg = AnalysisConfig::default();
//! let bundle = run_statistical_tests(&table, "group", "self_efficacy_change", &cfg).unwrap();
//! println!(
//!     "d = {:.3}, recommended {} (p = {:.3})",
//!     bundle.cohen_d, bundle.recommended_test, bundle.recommended_p
//! );
//! ```

mod assumptions;
mod baseline;
mod battery;
mod config;
mod correction;
mod descriptive;
mod dist;
mod effect_size;
mod error;
mod nonparametric;
mod paired;
mod parametric;
mod power;
mod subgroup;
mod table;

pub use assumptions::{
    levene, shapiro_wilk, test_homoscedasticity, test_normality, NormalityCheck, VarianceCheck,
};
pub use baseline::{
    ancova_comparison, residual_comparison, AdjustedResult, AdjustmentMethod, BaselineComparison,
};
pub use battery::{
    recommend_test, run_statistical_tests, RecommendedTest, TestBundle, TestOutcome,
};
pub use config::AnalysisConfig;
pub use correction::{benjamini_hochberg, bonferroni};
pub use descriptive::{
    confidence_interval, descriptive_stats, mean, median, quantile, stddev_sample, summarize,
    variance_sample, GroupSummary,
};
pub use effect_size::{
    cohen_d, effect_size, glass_delta, hedges_g, interpret_effect_size, EffectMagnitude,
    EffectSizeMethod,
};
pub use error::StatsError;
pub use nonparametric::{mann_whitney_u, wilcoxon_signed_rank, RankTest};
pub use paired::{paired_samples_test, PairedComparison, PairedResult};
pub use parametric::{paired_t_test, welch_t_test, TTest};
pub use power::{power_two_sample_t, sample_size_two_sample_t};
pub use subgroup::{analyze_subgroups, SubgroupOutcome};
pub use table::ObservationTable;
