//! Assumption checks feeding the test-selection policy.
//!
//! Normality is checked per group with the Shapiro-Wilk test (Royston's
//! AS R94 approximation); variance homogeneity across groups with Levene's
//! test in its median-centered (Brown-Forsythe) form, the robust variant
//! the study protocol used. A group too small for Shapiro-Wilk is reported
//! as undetermined, which is distinct from both "normal" and "not normal".

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::descriptive::{mean, median};
use crate::dist::{f_upper_p, norm_cdf, norm_inv_cdf};
use crate::error::StatsError;
use crate::table::ObservationTable;

/// Shapiro-Wilk outcome for one group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalityCheck {
    pub statistic: f64,
    pub p_value: f64,
    /// `None` when the group was too small (or degenerate) to decide.
    pub is_normal: Option<bool>,
}

/// Levene outcome across all groups.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VarianceCheck {
    pub statistic: f64,
    pub p_value: f64,
    /// `None` when fewer than two non-empty groups were available.
    pub equal_variances: Option<bool>,
}

/// Shapiro-Wilk W statistic and p-value. `None` when n is outside 3..=5000
/// or the sample is degenerate (non-finite or all-identical values).
pub fn shapiro_wilk(xs: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len();
    if !(3..=5000).contains(&n) || xs.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut x = xs.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if x[n - 1] - x[0] < 1e-300 {
        return None;
    }

    if n == 3 {
        return shapiro_wilk_n3(&x);
    }

    let nn2 = n / 2;
    let a = sw_coefficients(n, nn2)?;

    // W = (sum a_i (x_{n+1-i} - x_i))^2 / sum (x_i - mean)^2
    let mut sa = 0.0;
    for i in 0..nn2 {
        sa += a[i] * (x[n - 1 - i] - x[i]);
    }
    let m = mean(&x);
    let ss: f64 = x.iter().map(|&v| (v - m).powi(2)).sum();
    if ss < 1e-300 {
        return None;
    }
    let w = ((sa * sa) / ss).min(1.0);

    Some((w, sw_p_value(w, n).clamp(0.0, 1.0)))
}

// n = 3 has an exact arc-cosine p-value.
fn shapiro_wilk_n3(x: &[f64]) -> Option<(f64, f64)> {
    let a1 = std::f64::consts::FRAC_1_SQRT_2;
    let m = (x[0] + x[1] + x[2]) / 3.0;
    let ss: f64 = x.iter().map(|&v| (v - m).powi(2)).sum();
    if ss < 1e-300 {
        return None;
    }
    let num = a1 * (x[2] - x[0]);
    let w = ((num * num) / ss).clamp(0.75, 1.0);
    let p = (1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos()).clamp(0.0, 1.0);
    Some((w, p))
}

// Royston (1995) polynomial coefficients.
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

fn sw_poly(c: &[f64], x: f64) -> f64 {
    let mut acc = c[c.len() - 1];
    for &coef in c[..c.len() - 1].iter().rev() {
        acc = acc * x + coef;
    }
    acc
}

// Coefficients from Blom-approximated normal order statistics, with
// Royston's corrections to the one (n <= 5) or two (n > 5) tail weights.
fn sw_coefficients(n: usize, nn2: usize) -> Option<Vec<f64>> {
    let mut m = vec![0.0; nn2];
    let mut summ2 = 0.0;
    for (i, mi) in m.iter_mut().enumerate() {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        *mi = norm_inv_cdf(p);
        summ2 += *mi * *mi;
    }
    summ2 *= 2.0;
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();
    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;

    let mut a = vec![0.0; nn2];
    if n <= 5 {
        let fac_sq = summ2 - 2.0 * m[0] * m[0];
        let rest = 1.0 - 2.0 * a1 * a1;
        if fac_sq <= 0.0 || rest <= 0.0 {
            return None;
        }
        let fac = (fac_sq / rest).sqrt();
        a[0] = a1;
        for i in 1..nn2 {
            a[i] = -m[i] / fac;
        }
    } else {
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        let fac_sq = summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1];
        let rest = 1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2;
        if fac_sq <= 0.0 || rest <= 0.0 {
            return None;
        }
        let fac = (fac_sq / rest).sqrt();
        a[0] = a1;
        a[1] = a2;
        for i in 2..nn2 {
            a[i] = -m[i] / fac;
        }
    }
    Some(a)
}

// Royston's z-transformations of 1 - W.
fn sw_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    if n <= 11 {
        let gamma = sw_poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        let y2 = -(gamma - y).ln();
        let m = sw_poly(&SW_C3, nf);
        let s = sw_poly(&SW_C4, nf).exp();
        if s < 1e-300 {
            return 0.0;
        }
        1.0 - norm_cdf((y2 - m) / s)
    } else {
        let ln_n = nf.ln();
        let m = sw_poly(&SW_C5, ln_n);
        let s = sw_poly(&SW_C6, ln_n).exp();
        if s < 1e-300 {
            return 0.0;
        }
        1.0 - norm_cdf((y - m) / s)
    }
}

/// Per-group Shapiro-Wilk over present outcome values, in first-encounter
/// group order. Groups with fewer than 3 observations are undetermined.
pub fn test_normality(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
    config: &AnalysisConfig,
) -> Result<Vec<(String, NormalityCheck)>, StatsError> {
    let mut out = Vec::new();
    for label in table.levels(group_col)? {
        let values = table.values_where(group_col, &label, outcome_col)?;
        let check = match shapiro_wilk(&values) {
            Some((w, p)) => NormalityCheck {
                statistic: w,
                p_value: p,
                is_normal: Some(p > config.alpha),
            },
            None => {
                log::debug!(
                    "normality undetermined for group '{label}' (n = {})",
                    values.len()
                );
                NormalityCheck {
                    statistic: f64::NAN,
                    p_value: f64::NAN,
                    is_normal: None,
                }
            }
        };
        out.push((label, check));
    }
    Ok(out)
}

/// Levene's test statistic and p-value over two or more samples, using the
/// median-centered absolute deviations. `None` when fewer than two
/// non-empty groups are supplied.
pub fn levene(groups: &[Vec<f64>]) -> Option<(f64, f64)> {
    let usable: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    if usable.len() < 2 || usable.len() != groups.len() {
        return None;
    }

    let z_groups: Vec<Vec<f64>> = usable
        .iter()
        .map(|g| {
            let center = median(g);
            g.iter().map(|&x| (x - center).abs()).collect()
        })
        .collect();

    one_way_anova(&z_groups)
}

// One-way ANOVA F statistic and upper-tail p-value. Degenerate input
// (no within-group variation) yields NaN, which downstream comparisons
// treat as not establishing equality.
fn one_way_anova(groups: &[Vec<f64>]) -> Option<(f64, f64)> {
    let k = groups.len();
    let n_total: usize = groups.iter().map(Vec::len).sum();
    if k < 2 || n_total <= k {
        return None;
    }

    let grand: f64 = groups.iter().flatten().sum::<f64>() / n_total as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let m = mean(g);
        ss_between += g.len() as f64 * (m - grand).powi(2);
        ss_within += g.iter().map(|&x| (x - m).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    Some((f, f_upper_p(f, df_between, df_within)))
}

/// Levene's test over all groups of `group_col`. Requires at least two
/// groups, each with at least one present value; otherwise undetermined.
pub fn test_homoscedasticity(
    table: &ObservationTable,
    group_col: &str,
    outcome_col: &str,
    config: &AnalysisConfig,
) -> Result<VarianceCheck, StatsError> {
    let mut groups = Vec::new();
    for label in table.levels(group_col)? {
        groups.push(table.values_where(group_col, &label, outcome_col)?);
    }

    Ok(match levene(&groups) {
        Some((stat, p)) => VarianceCheck {
            statistic: stat,
            p_value: p,
            equal_variances: Some(p > config.alpha),
        },
        None => {
            log::debug!("homoscedasticity undetermined ({} usable groups)", {
                groups.iter().filter(|g| !g.is_empty()).count()
            });
            VarianceCheck {
                statistic: f64::NAN,
                p_value: f64::NAN,
                equal_variances: None,
            }
        }
    })
}
