use std::fs;

use trial_stats::{
    analyze_subgroups, ancova_comparison, power_two_sample_t, run_statistical_tests,
    sample_size_two_sample_t, AnalysisConfig, BaselineComparison, ObservationTable,
    SubgroupOutcome,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = "demos/trial_results.csv";
    let csv = fs::read_to_string(path)?;

    let mut groups = Vec::new();
    let mut genders = Vec::new();
    let mut baselines = Vec::new();
    let mut changes = Vec::new();

    for (i, line) in csv.lines().enumerate() {
        if i == 0 {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 4 {
            continue;
        }
        groups.push(Some(parts[0].trim().to_string()));
        genders.push(Some(parts[1].trim().to_string()));
        baselines.push(parts[2].trim().parse::<f64>().ok());
        changes.push(parts[3].trim().parse::<f64>().ok());
    }

    let mut table = ObservationTable::new(groups.len());
    table.add_categorical("group", groups)?;
    table.add_categorical("gender", genders)?;
    table.add_numeric("baseline", baselines)?;
    table.add_numeric("self_efficacy_change", changes)?;

    let cfg = AnalysisConfig::default();

    let bundle = run_statistical_tests(&table, "group", "self_efficacy_change", &cfg)?;
    println!("== {} vs {} ==", bundle.groups.0, bundle.groups.1);
    for (label, s) in &bundle.descriptives {
        println!(
            "  {label}: n={} mean={:.3} sd={:.3} median={:.3}",
            s.n, s.mean, s.std, s.median
        );
    }
    println!(
        "  cohen_d={:.3} hedges_g={:.3} recommended={} p={:.4}",
        bundle.cohen_d, bundle.hedges_g, bundle.recommended_test, bundle.recommended_p
    );

    println!("== subgroups by gender ==");
    for (level, outcome) in
        analyze_subgroups(&table, "gender", "self_efficacy_change", "group", &cfg)?
    {
        match outcome {
            SubgroupOutcome::Tested(b) => println!(
                "  {level}: d={:.3} {} p={:.4}",
                b.cohen_d, b.recommended_test, b.recommended_p
            ),
            SubgroupOutcome::InsufficientSample { observed, required } => {
                println!("  {level}: skipped ({observed} < {required})")
            }
            SubgroupOutcome::Invalid { reason } => println!("  {level}: {reason}"),
        }
    }

    println!("== baseline-adjusted ==");
    match ancova_comparison(&table, "group", "self_efficacy_change", "baseline", &cfg)? {
        BaselineComparison::Adjusted(a) => println!(
            "  adjusted d={:.3} t={:.3} p={:.4}",
            a.adjusted_effect_size, a.statistic, a.p_value
        ),
        BaselineComparison::Insufficient { observed, required } => {
            println!("  skipped ({observed} < {required})")
        }
    }

    println!("== power ==");
    let n_per_arm = table.len() / 2;
    println!(
        "  observed design power at d={:.2}: {:.3}",
        bundle.cohen_d.abs(),
        power_two_sample_t(bundle.cohen_d, n_per_arm, cfg.alpha)
    );
    println!(
        "  n/group for 80% power at this d: {}",
        sample_size_two_sample_t(bundle.cohen_d, cfg.alpha, 0.80)
    );

    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}
