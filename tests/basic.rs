use approx::assert_abs_diff_eq;
use trial_stats::{
    cohen_d, confidence_interval, descriptive_stats, effect_size, hedges_g, interpret_effect_size,
    AnalysisConfig, EffectMagnitude, EffectSizeMethod, ObservationTable,
};

fn labels(xs: &[&str]) -> Vec<Option<String>> {
    xs.iter().map(|s| Some(s.to_string())).collect()
}

#[test]
fn descriptives_over_present_values_only() {
    let mut t = ObservationTable::new(8);
    t.add_categorical(
        "group",
        labels(&["ai", "ai", "ai", "ai", "control", "control", "control", "control"]),
    )
    .unwrap();
    t.add_numeric(
        "change",
        vec![
            Some(1.0),
            Some(2.0),
            Some(3.0),
            None,
            Some(4.0),
            Some(5.0),
            Some(6.0),
            Some(7.0),
        ],
    )
    .unwrap();

    let stats = descriptive_stats(&t, "group", "change").unwrap();
    assert_eq!(stats.len(), 2);

    let (label, ai) = &stats[0];
    assert_eq!(label, "ai");
    assert_eq!(ai.n, 3);
    assert_abs_diff_eq!(ai.mean, 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(ai.median, 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(ai.q25, 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(ai.q75, 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(ai.min, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(ai.max, 3.0, epsilon = 1e-12);

    let (_, control) = &stats[1];
    assert_eq!(control.n, 4);
    assert_abs_diff_eq!(control.mean, 5.5, epsilon = 1e-12);
}

#[test]
fn all_missing_group_yields_nan_not_error() {
    let mut t = ObservationTable::new(4);
    t.add_categorical("group", labels(&["ai", "ai", "control", "control"]))
        .unwrap();
    t.add_numeric("change", vec![None, None, Some(1.0), Some(2.0)])
        .unwrap();

    let stats = descriptive_stats(&t, "group", "change").unwrap();
    let (_, ai) = &stats[0];
    assert_eq!(ai.n, 0);
    assert!(ai.mean.is_nan());
    assert!(ai.std.is_nan());
    assert!(ai.median.is_nan());
    assert!(ai.min.is_nan());
    assert!(ai.max.is_nan());
}

#[test]
fn effect_size_variants_agree_on_the_pilot_example() {
    let ai = [1.0, 2.0, 3.0, 4.0, 5.0];
    let control = [2.0, 3.0, 4.0, 5.0, 6.0];

    let d = effect_size(&ai, &control, EffectSizeMethod::CohenD);
    assert_abs_diff_eq!(d, -1.0 / 2.5f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(d, cohen_d(&ai, &control), epsilon = 1e-12);

    let g = effect_size(&ai, &control, EffectSizeMethod::HedgesG);
    assert_abs_diff_eq!(g, hedges_g(&ai, &control), epsilon = 1e-12);
    assert!(g.abs() < d.abs());

    let cfg = AnalysisConfig::default();
    assert_eq!(interpret_effect_size(d, &cfg), EffectMagnitude::Medium);
}

#[test]
fn confidence_interval_brackets_the_mean() {
    let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let (lo, hi) = confidence_interval(&xs, 0.95);
    let m = xs.iter().sum::<f64>() / xs.len() as f64;
    assert!(lo < m && m < hi);

    let (lo99, hi99) = confidence_interval(&xs, 0.99);
    assert!(lo99 < lo && hi < hi99);
}
