use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use trial_stats::{
    recommend_test, run_statistical_tests, AnalysisConfig, ObservationTable, RecommendedTest,
    StatsError,
};

fn two_arm_table(g1: &[f64], g2: &[f64]) -> ObservationTable {
    let mut groups = Vec::new();
    let mut values = Vec::new();
    for &v in g1 {
        groups.push(Some("ai".to_string()));
        values.push(Some(v));
    }
    for &v in g2 {
        groups.push(Some("control".to_string()));
        values.push(Some(v));
    }
    let mut t = ObservationTable::new(groups.len());
    t.add_categorical("group", groups).unwrap();
    t.add_numeric("change", values).unwrap();
    t
}

#[test]
fn bundle_is_internally_consistent() {
    let table = two_arm_table(
        &[3.1, 4.2, 2.8, 5.0, 3.9, 4.4, 3.3, 4.8],
        &[2.0, 2.9, 1.8, 3.2, 2.5, 3.0, 2.2, 2.7],
    );
    let cfg = AnalysisConfig::default();
    let bundle = run_statistical_tests(&table, "group", "change", &cfg).unwrap();

    assert_eq!(bundle.groups.0, "ai");
    assert_eq!(bundle.groups.1, "control");
    assert_eq!(bundle.descriptives.len(), 2);
    assert_eq!(bundle.normality.len(), 2);

    // group1 scores higher, so every signed quantity is positive.
    assert!(bundle.cohen_d > 0.0);
    assert!(bundle.hedges_g > 0.0);
    assert!(bundle.t_test.statistic > 0.0);
    assert!(bundle.hedges_g.abs() < bundle.cohen_d.abs());

    // The recommended p must be one of the two computed p-values.
    let expected = match bundle.recommended_test {
        RecommendedTest::TTest => bundle.t_test.p_value,
        RecommendedTest::MannWhitney => bundle.mann_whitney.p_value,
    };
    assert_abs_diff_eq!(bundle.recommended_p, expected, epsilon = 0.0);

    // The recommendation is reproducible from the reported checks.
    let votes: Vec<Option<bool>> = bundle.normality.iter().map(|(_, c)| c.is_normal).collect();
    assert_eq!(
        recommend_test(&votes, bundle.homoscedasticity.equal_variances),
        bundle.recommended_test
    );
}

#[test]
fn tiny_arms_fall_back_to_mann_whitney() {
    // Two observations per arm: normality is undetermined, and the
    // median-centered deviations are degenerate, so homogeneity is never
    // positively established.
    let table = two_arm_table(&[1.0, 2.0], &[3.0, 4.0]);
    let bundle = run_statistical_tests(&table, "group", "change", &Default::default()).unwrap();

    for (_, check) in &bundle.normality {
        assert_eq!(check.is_normal, None);
        assert!(check.p_value.is_nan());
    }
    assert_eq!(bundle.recommended_test, RecommendedTest::MannWhitney);
}

#[test]
fn single_group_is_an_error() {
    let mut t = ObservationTable::new(3);
    t.add_categorical(
        "group",
        vec![
            Some("ai".to_string()),
            Some("ai".to_string()),
            Some("ai".to_string()),
        ],
    )
    .unwrap();
    t.add_numeric("change", vec![Some(1.0), Some(2.0), Some(3.0)])
        .unwrap();

    let err = run_statistical_tests(&t, "group", "change", &Default::default()).unwrap_err();
    match err {
        StatsError::GroupCount { column, labels } => {
            assert_eq!(column, "group");
            assert_eq!(labels, vec!["ai".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_outcome_column_is_an_error() {
    let table = two_arm_table(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
    let err = run_statistical_tests(&table, "group", "nope", &Default::default()).unwrap_err();
    assert!(matches!(err, StatsError::UnknownColumn(_)));
}

#[test]
fn stricter_alpha_flips_significance_only() {
    let table = two_arm_table(
        &[10.1, 11.3, 9.8, 10.9, 11.6, 10.4, 11.0, 10.7],
        &[8.2, 9.1, 8.8, 7.9, 9.4, 8.5, 9.0, 8.3],
    );
    let loose = run_statistical_tests(
        &table,
        "group",
        "change",
        &AnalysisConfig {
            alpha: 0.05,
            ..Default::default()
        },
    )
    .unwrap();
    let strict = run_statistical_tests(
        &table,
        "group",
        "change",
        &AnalysisConfig {
            alpha: 1e-12,
            ..Default::default()
        },
    )
    .unwrap();

    // Statistics and p-values are alpha-independent.
    assert_abs_diff_eq!(
        loose.t_test.p_value,
        strict.t_test.p_value,
        epsilon = 0.0
    );
    assert!(loose.t_test.significant);
    assert!(!strict.t_test.significant);
}

#[cfg(feature = "serde")]
#[test]
fn bundle_serializes_to_json() {
    let table = two_arm_table(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 3.0, 4.0, 5.0, 6.0]);
    let bundle = run_statistical_tests(&table, "group", "change", &Default::default()).unwrap();

    let json = serde_json::to_value(&bundle).unwrap();
    assert_eq!(json["recommended_test"], "t_test");
    assert_eq!(json["groups"][0], "ai");
    assert!(json["cohen_d"].as_f64().unwrap() < 0.0);

    let back: trial_stats::TestBundle = serde_json::from_value(json).unwrap();
    assert_eq!(back, bundle);
}
