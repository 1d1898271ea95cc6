//! Pre/post paired-samples battery.
//!
//! Complements the between-group battery for within-participant questions:
//! did scores move from before the intervention to after, pooling both
//! arms or within one arm. Pairs with either side missing are dropped.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::battery::TestOutcome;
use crate::config::AnalysisConfig;
use crate::descriptive::{mean, stddev_sample};
use crate::error::StatsError;
use crate::nonparametric::wilcoxon_signed_rank;
use crate::parametric::paired_t_test;
use crate::table::ObservationTable;

/// Everything the paired battery computes for one pre/post column pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairedResult {
    pub n_pairs: usize,
    pub pre_mean: f64,
    pub pre_std: f64,
    pub post_mean: f64,
    pub post_std: f64,
    pub difference_mean: f64,
    pub difference_std: f64,
    pub paired_t_test: TestOutcome,
    pub wilcoxon: TestOutcome,
    /// Cohen's d_z: mean difference over the standard deviation of
    /// differences.
    pub effect_size_dz: f64,
}

/// Paired battery, or an explicit insufficient-data record when fewer than
/// two complete pairs exist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PairedComparison {
    Insufficient { observed: usize, required: usize },
    Tested(PairedResult),
}

/// Compare `pre_col` against `post_col` over complete pairs.
pub fn paired_samples_test(
    table: &ObservationTable,
    pre_col: &str,
    post_col: &str,
    config: &AnalysisConfig,
) -> Result<PairedComparison, StatsError> {
    let pre_raw = table.numeric(pre_col)?;
    let post_raw = table.numeric(post_col)?;

    let mut pre = Vec::new();
    let mut post = Vec::new();
    for (a, b) in pre_raw.iter().zip(post_raw.iter()) {
        if let (Some(a), Some(b)) = (a, b) {
            pre.push(*a);
            post.push(*b);
        }
    }
    if pre.len() < 2 {
        return Ok(PairedComparison::Insufficient {
            observed: pre.len(),
            required: 2,
        });
    }

    let diffs: Vec<f64> = post.iter().zip(pre.iter()).map(|(p, q)| p - q).collect();
    let t = paired_t_test(&pre, &post);
    let w = wilcoxon_signed_rank(&pre, &post);
    let diff_mean = mean(&diffs);
    let diff_std = stddev_sample(&diffs);

    Ok(PairedComparison::Tested(PairedResult {
        n_pairs: pre.len(),
        pre_mean: mean(&pre),
        pre_std: stddev_sample(&pre),
        post_mean: mean(&post),
        post_std: stddev_sample(&post),
        difference_mean: diff_mean,
        difference_std: diff_std,
        paired_t_test: TestOutcome::at_alpha(t.statistic, t.p_value, config.alpha),
        wilcoxon: TestOutcome::at_alpha(w.statistic, w.p_value, config.alpha),
        effect_size_dz: diff_mean / diff_std,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn complete_pairs_only() {
        let mut t = ObservationTable::new(6);
        t.add_numeric(
            "pre",
            vec![Some(5.0), Some(6.0), Some(7.0), Some(8.0), Some(9.0), None],
        )
        .unwrap();
        t.add_numeric(
            "post",
            vec![
                Some(6.0),
                Some(7.5),
                Some(8.0),
                Some(9.5),
                Some(11.0),
                Some(4.0),
            ],
        )
        .unwrap();

        let res = paired_samples_test(&t, "pre", "post", &Default::default()).unwrap();
        let r = match res {
            PairedComparison::Tested(r) => r,
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(r.n_pairs, 5);
        assert_abs_diff_eq!(r.difference_mean, 1.4, epsilon = 1e-12);
        assert_abs_diff_eq!(
            r.effect_size_dz,
            r.difference_mean / r.difference_std,
            epsilon = 1e-12
        );
        assert!(r.paired_t_test.significant);
        assert!(r.wilcoxon.significant);
    }

    #[test]
    fn too_few_pairs_is_reported_as_data() {
        let mut t = ObservationTable::new(3);
        t.add_numeric("pre", vec![Some(1.0), None, None]).unwrap();
        t.add_numeric("post", vec![Some(2.0), Some(3.0), None])
            .unwrap();
        let res = paired_samples_test(&t, "pre", "post", &Default::default()).unwrap();
        assert_eq!(
            res,
            PairedComparison::Insufficient {
                observed: 1,
                required: 2
            }
        );
    }
}
