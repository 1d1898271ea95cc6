//! Subgroup analysis: the battery applied within each level of a
//! demographic partition, gated by a minimum sample size.
//!
//! A bad level never aborts the run. Levels below the size gate and levels
//! that break the two-arm invariant are stored as explicit records next to
//! the successful bundles.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::battery::{run_statistical_tests, TestBundle};
use crate::config::AnalysisConfig;
use crate::error::StatsError;
use crate::table::ObservationTable;

/// Per-level outcome of a subgroup analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubgroupOutcome {
    /// The level met the gate and the battery ran.
    Tested(Box<TestBundle>),
    /// The level was below the minimum size; no test was attempted.
    InsufficientSample { observed: usize, required: usize },
    /// The level's subset failed battery validation (e.g. one arm absent).
    Invalid { reason: String },
}

/// Run the comparison battery independently within every distinct
/// non-missing level of `subgroup_col`, in first-encounter order.
pub fn analyze_subgroups(
    table: &ObservationTable,
    subgroup_col: &str,
    outcome_col: &str,
    group_col: &str,
    config: &AnalysisConfig,
) -> Result<Vec<(String, SubgroupOutcome)>, StatsError> {
    let mut results = Vec::new();
    for level in table.levels(subgroup_col)? {
        let subset = table.filter_eq(subgroup_col, &level)?;
        let outcome = if subset.len() < config.min_subgroup_size {
            log::warn!(
                "subgroup '{level}' below minimum size ({} < {})",
                subset.len(),
                config.min_subgroup_size
            );
            SubgroupOutcome::InsufficientSample {
                observed: subset.len(),
                required: config.min_subgroup_size,
            }
        } else {
            match run_statistical_tests(&subset, group_col, outcome_col, config) {
                Ok(bundle) => SubgroupOutcome::Tested(Box::new(bundle)),
                Err(err @ StatsError::GroupCount { .. }) => {
                    log::warn!("subgroup '{level}' skipped: {err}");
                    SubgroupOutcome::Invalid {
                        reason: err.to_string(),
                    }
                }
                // Misnamed columns are caller bugs, not data conditions.
                Err(other) => return Err(other),
            }
        };
        results.push((level, outcome));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group: &str, bracket: &str, y: f64) -> (Option<String>, Option<String>, Option<f64>) {
        (Some(group.to_string()), Some(bracket.to_string()), Some(y))
    }

    fn build(rows: Vec<(Option<String>, Option<String>, Option<f64>)>) -> ObservationTable {
        let mut t = ObservationTable::new(rows.len());
        t.add_categorical("group", rows.iter().map(|r| r.0.clone()).collect())
            .unwrap();
        t.add_categorical("age_bracket", rows.iter().map(|r| r.1.clone()).collect())
            .unwrap();
        t.add_numeric("y", rows.iter().map(|r| r.2).collect())
            .unwrap();
        t
    }

    fn balanced_level(bracket: &str, n_per_arm: usize) -> Vec<(Option<String>, Option<String>, Option<f64>)> {
        let mut rows = Vec::new();
        for i in 0..n_per_arm {
            rows.push(row("ai", bracket, 1.0 + i as f64));
            rows.push(row("control", bracket, 2.0 + 1.5 * i as f64));
        }
        rows
    }

    #[test]
    fn gate_boundary_is_exact() {
        let cfg = AnalysisConfig {
            min_subgroup_size: 10,
            ..Default::default()
        };

        // "18-25": exactly 10 rows; "26-35": exactly 9 rows.
        let mut rows = balanced_level("18-25", 5);
        rows.extend(balanced_level("26-35", 4));
        rows.push(row("ai", "26-35", 9.0));
        let table = build(rows);

        let results = analyze_subgroups(&table, "age_bracket", "y", "group", &cfg).unwrap();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, SubgroupOutcome::Tested(_)));
        assert_eq!(
            results[1].1,
            SubgroupOutcome::InsufficientSample {
                observed: 9,
                required: 10
            }
        );
    }

    #[test]
    fn single_arm_level_is_invalid_not_fatal() {
        let mut rows = balanced_level("18-25", 5);
        // A level with enough rows but only one arm present.
        for i in 0..10 {
            rows.push(row("ai", "36+", i as f64));
        }
        let table = build(rows);

        let results =
            analyze_subgroups(&table, "age_bracket", "y", "group", &Default::default()).unwrap();
        let (level, outcome) = &results[1];
        assert_eq!(level, "36+");
        assert!(matches!(outcome, SubgroupOutcome::Invalid { .. }));
        // The other level still got a full bundle.
        assert!(matches!(results[0].1, SubgroupOutcome::Tested(_)));
    }

    #[test]
    fn missing_partition_values_are_skipped() {
        let mut rows = balanced_level("18-25", 5);
        rows.push((Some("ai".to_string()), None, Some(1.0)));
        let table = build(rows);

        let results =
            analyze_subgroups(&table, "age_bracket", "y", "group", &Default::default()).unwrap();
        assert_eq!(results.len(), 1);
    }
}
