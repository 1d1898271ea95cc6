//! Baseline-adjusted group comparison.
//!
//! Controls for a pre-existing imbalance on a baseline covariate before
//! comparing the post-intervention outcome. Two strategies over the same
//! complete cases (rows with group, outcome, and baseline all present):
//!
//! - ANCOVA: outcome regressed on a group indicator plus the baseline;
//!   the group coefficient is the adjusted difference and its t-test the
//!   adjusted comparison.
//! - Residual scores: outcome regressed on the baseline alone; the
//!   per-group residuals are compared with the ordinary Welch t-test and
//!   Cohen's d.
//!
//! The group contrast is derived from whichever two labels are present,
//! coded so every signed quantity is group1 minus group2 with group1 the
//! first-encountered label. Both strategies also report the unadjusted
//! effect size and the raw baseline difference for comparison.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::descriptive::mean;
use crate::dist::t_two_sided_p;
use crate::effect_size::cohen_d;
use crate::error::StatsError;
use crate::parametric::welch_t_test;
use crate::table::ObservationTable;

/// How the adjusted scores were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdjustmentMethod {
    Ancova,
    ResidualScores,
}

/// A fitted baseline-adjusted comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdjustedResult {
    pub groups: (String, String),
    pub method: AdjustmentMethod,
    pub raw_means: (f64, f64),
    pub raw_effect_size: f64,
    pub baseline_means: (f64, f64),
    /// group1 minus group2 on the baseline covariate.
    pub baseline_difference: f64,
    /// Group means of the outcome evaluated at the overall mean baseline.
    pub adjusted_means: (f64, f64),
    pub adjusted_effect_size: f64,
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Baseline-adjusted comparison, or an explicit insufficient-data record
/// when the complete-case total is below the configured floor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BaselineComparison {
    Insufficient { observed: usize, required: usize },
    Adjusted(Box<AdjustedResult>),
}

// Complete cases split by arm, preserving first-encounter label order.
struct CompleteCases {
    labels: (String, String),
    // Parallel vectors over all complete rows.
    indicator: Vec<f64>, // 1.0 for group1, 0.0 for group2
    outcome: Vec<f64>,
    baseline: Vec<f64>,
}

fn complete_cases(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
    baseline_col: &str,
) -> Result<CompleteCases, StatsError> {
    let groups = table.categorical(group_col)?;
    let outcomes = table.numeric(outcome_col)?;
    let baselines = table.numeric(baseline_col)?;

    let mut labels: Vec<String> = Vec::new();
    let mut rows: Vec<(String, f64, f64)> = Vec::new();
    for ((g, y), x) in groups.iter().zip(outcomes.iter()).zip(baselines.iter()) {
        if let (Some(g), Some(y), Some(x)) = (g, y, x) {
            if !labels.iter().any(|l| l == g) {
                labels.push(g.clone());
            }
            rows.push((g.clone(), *y, *x));
        }
    }
    if labels.len() != 2 {
        return Err(StatsError::GroupCount {
            column: group_col.to_string(),
            labels,
        });
    }

    let indicator = rows
        .iter()
        .map(|(g, _, _)| if *g == labels[0] { 1.0 } else { 0.0 })
        .collect();
    Ok(CompleteCases {
        labels: (labels[0].clone(), labels[1].clone()),
        indicator,
        outcome: rows.iter().map(|r| r.1).collect(),
        baseline: rows.iter().map(|r| r.2).collect(),
    })
}

impl CompleteCases {
    fn split<'a>(&self, values: &'a [f64]) -> (Vec<f64>, Vec<f64>) {
        let mut g1 = Vec::new();
        let mut g2 = Vec::new();
        for (&ind, &v) in self.indicator.iter().zip(values.iter()) {
            if ind == 1.0 {
                g1.push(v);
            } else {
                g2.push(v);
            }
        }
        (g1, g2)
    }

    fn raw_parts(&self) -> ((f64, f64), f64, (f64, f64), f64) {
        let (y1, y2) = self.split(&self.outcome);
        let (x1, x2) = self.split(&self.baseline);
        let raw_means = (mean(&y1), mean(&y2));
        let raw_d = cohen_d(&y1, &y2);
        let baseline_means = (mean(&x1), mean(&x2));
        let baseline_diff = baseline_means.0 - baseline_means.1;
        (raw_means, raw_d, baseline_means, baseline_diff)
    }
}

/// ANCOVA-adjusted comparison of `outcome_col` between the two arms,
/// controlling for `baseline_col`.
pub fn ancova_comparison(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
    baseline_col: &str,
    config: &AnalysisConfig,
) -> Result<BaselineComparison, StatsError> {
    let cases = complete_cases(table, group_col, outcome_col, baseline_col)?;
    let n = cases.outcome.len();
    if n < config.min_adjusted_total {
        log::warn!(
            "baseline adjustment skipped: {n} complete cases < {}",
            config.min_adjusted_total
        );
        return Ok(BaselineComparison::Insufficient {
            observed: n,
            required: config.min_adjusted_total,
        });
    }

    let (raw_means, raw_d, baseline_means, baseline_diff) = cases.raw_parts();
    let fit = ols2(&cases.indicator, &cases.baseline, &cases.outcome);

    let (adjusted_means, adjusted_d, t, p) = match fit {
        Some(fit) => {
            let x_bar = mean(&cases.baseline);
            let m1 = fit.b0 + fit.b1 + fit.b2 * x_bar;
            let m2 = fit.b0 + fit.b2 * x_bar;
            let adjusted_d = fit.b1 / fit.residual_se;
            let t = fit.b1 / fit.se_b1;
            let p = t_two_sided_p(t, fit.df);
            ((m1, m2), adjusted_d, t, p)
        }
        None => {
            log::warn!("ANCOVA design matrix is singular; reporting NaN adjustment");
            ((f64::NAN, f64::NAN), f64::NAN, f64::NAN, f64::NAN)
        }
    };

    Ok(BaselineComparison::Adjusted(Box::new(AdjustedResult {
        groups: cases.labels.clone(),
        method: AdjustmentMethod::Ancova,
        raw_means,
        raw_effect_size: raw_d,
        baseline_means,
        baseline_difference: baseline_diff,
        adjusted_means,
        adjusted_effect_size: adjusted_d,
        statistic: t,
        p_value: p,
        significant: p < config.alpha,
    })))
}

/// Residual-score fallback: regress the outcome on the baseline alone,
/// then compare the per-group residuals.
pub fn residual_comparison(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
    baseline_col: &str,
    config: &AnalysisConfig,
) -> Result<BaselineComparison, StatsError> {
    let cases = complete_cases(table, group_col, outcome_col, baseline_col)?;
    let n = cases.outcome.len();
    if n < config.min_adjusted_total {
        return Ok(BaselineComparison::Insufficient {
            observed: n,
            required: config.min_adjusted_total,
        });
    }

    let (raw_means, raw_d, baseline_means, baseline_diff) = cases.raw_parts();

    let (slope, intercept) = simple_ols(&cases.baseline, &cases.outcome);
    let residuals: Vec<f64> = cases
        .outcome
        .iter()
        .zip(cases.baseline.iter())
        .map(|(&y, &x)| y - (intercept + slope * x))
        .collect();

    let (r1, r2) = cases.split(&residuals);
    let grand = mean(&cases.outcome);
    let t = welch_t_test(&r1, &r2);

    Ok(BaselineComparison::Adjusted(Box::new(AdjustedResult {
        groups: cases.labels.clone(),
        method: AdjustmentMethod::ResidualScores,
        raw_means,
        raw_effect_size: raw_d,
        baseline_means,
        baseline_difference: baseline_diff,
        // Residual means shifted back to outcome units.
        adjusted_means: (grand + mean(&r1), grand + mean(&r2)),
        adjusted_effect_size: cohen_d(&r1, &r2),
        statistic: t.statistic,
        p_value: t.p_value,
        significant: t.p_value < config.alpha,
    })))
}

struct Ols2Fit {
    b0: f64,
    b1: f64,
    b2: f64,
    se_b1: f64,
    residual_se: f64,
    df: f64,
}

// Least squares for y = b0 + b1*g + b2*x, solved from the closed-form
// inverse of the 3x3 normal matrix. Returns None when the design is
// singular (constant baseline or a single arm).
fn ols2(g: &[f64], x: &[f64], y: &[f64]) -> Option<Ols2Fit> {
    let n = y.len() as f64;
    if y.len() < 4 {
        return None;
    }

    let sg: f64 = g.iter().sum();
    let sx: f64 = x.iter().sum();
    let sgg: f64 = g.iter().map(|v| v * v).sum();
    let sxx: f64 = x.iter().map(|v| v * v).sum();
    let sgx: f64 = g.iter().zip(x.iter()).map(|(a, b)| a * b).sum();
    let sy: f64 = y.iter().sum();
    let sgy: f64 = g.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sxy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();

    // Normal matrix S and right-hand side v.
    let s = [[n, sg, sx], [sg, sgg, sgx], [sx, sgx, sxx]];
    let v = [sy, sgy, sxy];

    let det = s[0][0] * (s[1][1] * s[2][2] - s[1][2] * s[2][1])
        - s[0][1] * (s[1][0] * s[2][2] - s[1][2] * s[2][0])
        + s[0][2] * (s[1][0] * s[2][1] - s[1][1] * s[2][0]);
    let scale = n * sxx.max(1.0);
    if det.abs() < 1e-10 * scale {
        return None;
    }

    // Cofactor rows of the inverse (S is symmetric).
    let inv = |r: usize, c: usize| -> f64 {
        let (r1, r2) = match r {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let (c1, c2) = match c {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let minor = s[r1][c1] * s[r2][c2] - s[r1][c2] * s[r2][c1];
        let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
        sign * minor / det
    };

    let b0 = inv(0, 0) * v[0] + inv(0, 1) * v[1] + inv(0, 2) * v[2];
    let b1 = inv(1, 0) * v[0] + inv(1, 1) * v[1] + inv(1, 2) * v[2];
    let b2 = inv(2, 0) * v[0] + inv(2, 1) * v[1] + inv(2, 2) * v[2];

    let sse: f64 = y
        .iter()
        .zip(g.iter().zip(x.iter()))
        .map(|(&yi, (&gi, &xi))| {
            let e = yi - (b0 + b1 * gi + b2 * xi);
            e * e
        })
        .sum();
    let df = n - 3.0;
    let sigma2 = sse / df;

    Some(Ols2Fit {
        b0,
        b1,
        b2,
        se_b1: (sigma2 * inv(1, 1)).sqrt(),
        residual_se: sigma2.sqrt(),
        df,
    })
}

// Simple least squares y = intercept + slope * x. A constant baseline
// degenerates to slope 0, leaving the residuals equal to centered outcomes.
fn simple_ols(x: &[f64], y: &[f64]) -> (f64, f64) {
    let x_bar = mean(x);
    let y_bar = mean(y);
    let sxx: f64 = x.iter().map(|&v| (v - x_bar).powi(2)).sum();
    let sxy: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&a, &b)| (a - x_bar) * (b - y_bar))
        .sum();
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, y_bar - slope * x_bar)
}
