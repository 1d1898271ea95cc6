//! Opt-in multiple-comparison adjustment.
//!
//! The battery applies alpha to each outcome independently, which inflates
//! the family-wise false-positive rate when many self-efficacy dimensions
//! are tested side by side. These helpers let the caller adjust the
//! collected p-values after the fact; the battery itself stays uncorrected.

/// Bonferroni: p * m, capped at 1.
pub fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values.iter().map(|&p| (p * m).min(1.0)).collect()
}

/// Benjamini-Hochberg step-up FDR adjustment.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mf = m as f64;
    let mut adjusted = vec![0.0; m];
    let mut running_min = f64::INFINITY;
    for (rank_minus_one, &idx) in order.iter().enumerate().rev() {
        let rank = (rank_minus_one + 1) as f64;
        let adj = (p_values[idx] * mf / rank).min(1.0);
        running_min = running_min.min(adj);
        adjusted[idx] = running_min;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bonferroni_scales_and_caps() {
        let adj = bonferroni(&[0.01, 0.04, 0.6]);
        assert_abs_diff_eq!(adj[0], 0.03, epsilon = 1e-12);
        assert_abs_diff_eq!(adj[1], 0.12, epsilon = 1e-12);
        assert_abs_diff_eq!(adj[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn benjamini_hochberg_known_example() {
        // All four adjust to 0.04: each p_i * 4 / i equals 0.04.
        let adj = benjamini_hochberg(&[0.01, 0.02, 0.03, 0.04]);
        for a in adj {
            assert_abs_diff_eq!(a, 0.04, epsilon = 1e-12);
        }
    }

    #[test]
    fn benjamini_hochberg_preserves_input_order() {
        let adj = benjamini_hochberg(&[0.9, 0.001]);
        assert!(adj[0] > adj[1]);
        assert!(adj.iter().all(|&a| (0.0..=1.0).contains(&a)));
    }

    #[test]
    fn empty_input() {
        assert!(bonferroni(&[]).is_empty());
        assert!(benjamini_hochberg(&[]).is_empty());
    }
}
