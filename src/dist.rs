//! Thin wrappers around `statrs` distributions.
//!
//! One definition per transform, shared by every test in the crate. All
//! wrappers map invalid parameters to NaN instead of panicking, so a
//! degenerate fit surfaces as missing data in the result records.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

pub(crate) fn norm_cdf(x: f64) -> f64 {
    // The standard normal constructor cannot fail.
    Normal::new(0.0, 1.0).unwrap().cdf(x)
}

pub(crate) fn norm_inv_cdf(p: f64) -> f64 {
    Normal::new(0.0, 1.0).unwrap().inverse_cdf(p)
}

/// Two-sided p-value for a t statistic. Infinite df falls back to the
/// normal distribution (the Welch df blows up when one variance is zero).
pub(crate) fn t_two_sided_p(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    if df.is_infinite() {
        return (2.0 * (1.0 - norm_cdf(t.abs()))).clamp(0.0, 1.0);
    }
    if !(df > 0.0) {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => (2.0 * (1.0 - d.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

/// Upper-tail critical value for a two-sided interval at `confidence`.
pub(crate) fn t_critical(df: f64, confidence: f64) -> f64 {
    if !(df > 0.0) || !(0.0..1.0).contains(&confidence) {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d.inverse_cdf(1.0 - (1.0 - confidence) / 2.0),
        Err(_) => f64::NAN,
    }
}

/// Upper-tail p-value for an F statistic.
pub(crate) fn f_upper_p(f: f64, df1: f64, df2: f64) -> f64 {
    if !f.is_finite() || !(df1 > 0.0) || !(df2 > 0.0) {
        return f64::NAN;
    }
    match FisherSnedecor::new(df1, df2) {
        Ok(d) => (1.0 - d.cdf(f)).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
