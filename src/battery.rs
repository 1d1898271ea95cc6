//! The fixed two-arm comparison battery and its test-selection policy.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assumptions::{test_homoscedasticity, test_normality, NormalityCheck, VarianceCheck};
use crate::config::AnalysisConfig;
use crate::descriptive::{descriptive_stats, GroupSummary};
use crate::effect_size::{cohen_d, glass_delta, hedges_g};
use crate::error::StatsError;
use crate::nonparametric::mann_whitney_u;
use crate::parametric::welch_t_test;
use crate::table::ObservationTable;

/// One sub-test's verdict at the configured alpha.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl TestOutcome {
    pub(crate) fn at_alpha(statistic: f64, p_value: f64, alpha: f64) -> Self {
        Self {
            statistic,
            p_value,
            significant: p_value < alpha,
        }
    }
}

/// Which of the two comparison tests the assumption checks favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecommendedTest {
    TTest,
    MannWhitney,
}

impl std::fmt::Display for RecommendedTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RecommendedTest::TTest => "t_test",
            RecommendedTest::MannWhitney => "mann_whitney",
        })
    }
}

/// Everything the battery computes for one outcome column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TestBundle {
    /// (group1, group2) in first-encounter order; every signed quantity
    /// in the bundle is group1 minus group2.
    pub groups: (String, String),
    pub descriptives: Vec<(String, GroupSummary)>,
    pub cohen_d: f64,
    pub hedges_g: f64,
    pub glass_delta: f64,
    pub t_test: TestOutcome,
    pub mann_whitney: TestOutcome,
    pub normality: Vec<(String, NormalityCheck)>,
    pub homoscedasticity: VarianceCheck,
    pub recommended_test: RecommendedTest,
    pub recommended_p: f64,
}

/// Decision table over the two assumption results.
///
/// The t-test is recommended only when every *determined* normality result
/// is normal (undetermined groups abstain) and variance homogeneity was
/// positively established. Anything else falls back to Mann-Whitney.
pub fn recommend_test(
    normality: &[Option<bool>],
    equal_variances: Option<bool>,
) -> RecommendedTest {
    let normality_ok = normality.iter().flatten().all(|&is_normal| is_normal);
    if normality_ok && equal_variances == Some(true) {
        RecommendedTest::TTest
    } else {
        RecommendedTest::MannWhitney
    }
}

/// Run the full comparison battery for one outcome column.
///
/// Fails with [`StatsError::GroupCount`] unless `group_col` carries exactly
/// two distinct non-missing labels. Alpha applies to every sub-test
/// independently; no multiple-comparison correction is performed here (see
/// [`crate::correction`] for opt-in adjustment across outcomes).
pub fn run_statistical_tests(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
    config: &AnalysisConfig,
) -> Result<TestBundle, StatsError> {
    let levels = table.levels(group_col)?;
    if levels.len() != 2 {
        return Err(StatsError::GroupCount {
            column: group_col.to_string(),
            labels: levels,
        });
    }
    let group1 = table.values_where(group_col, &levels[0], outcome_col)?;
    let group2 = table.values_where(group_col, &levels[1], outcome_col)?;
    log::debug!(
        "battery '{outcome_col}': {} (n = {}) vs {} (n = {})",
        levels[0],
        group1.len(),
        levels[1],
        group2.len()
    );

    let descriptives = descriptive_stats(table, group_col, outcome_col)?;

    let t = welch_t_test(&group1, &group2);
    let u = mann_whitney_u(&group1, &group2);
    let normality = test_normality(table, group_col, outcome_col, config)?;
    let homoscedasticity = test_homoscedasticity(table, group_col, outcome_col, config)?;

    let votes: Vec<Option<bool>> = normality.iter().map(|(_, c)| c.is_normal).collect();
    let recommended_test = recommend_test(&votes, homoscedasticity.equal_variances);
    let recommended_p = match recommended_test {
        RecommendedTest::TTest => t.p_value,
        RecommendedTest::MannWhitney => u.p_value,
    };

    Ok(TestBundle {
        groups: (levels[0].clone(), levels[1].clone()),
        descriptives,
        cohen_d: cohen_d(&group1, &group2),
        hedges_g: hedges_g(&group1, &group2),
        glass_delta: glass_delta(&group1, &group2),
        t_test: TestOutcome::at_alpha(t.statistic, t.p_value, config.alpha),
        mann_whitney: TestOutcome::at_alpha(u.statistic, u.p_value, config.alpha),
        normality,
        homoscedasticity,
        recommended_test,
        recommended_p,
    })
}
