//! Plain-text rendering of estimates and dataset stats.

use district_map_consolidation_models::{ConsolidationEstimate, ConsolidationResult, MissingData};
use district_map_dataset::{DatasetKind, DatasetStats};
use district_map_normalize::DistrictKey;

pub fn render_result(result: &ConsolidationResult) -> String {
    let mut lines = match result {
        ConsolidationResult::Complete(estimate) => estimate_lines(estimate),
        ConsolidationResult::Incomplete(incomplete) => missing_lines(&incomplete.missing),
    };

    if !result.warnings().is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(result.warnings().iter().map(|w| format!("  - {w}")));
    }

    finish(lines)
}

pub fn render_stats(stats: &DatasetStats) -> String {
    let mut lines = vec![
        format!("Budgets:     {}", stats.budgets),
        format!("Enrollments: {}", stats.enrollments),
        format!("Anchors:     {}", stats.anchors),
        format!("Complete:    {}", stats.complete),
    ];

    for kind in DatasetKind::ALL {
        let keys = stats.missing.get(kind).map_or(&[][..], Vec::as_slice);
        if !keys.is_empty() {
            lines.push(format!(
                "Missing from {} ({}): {}",
                kind.file_name(),
                keys.len(),
                join_keys(keys)
            ));
        }
    }

    finish(lines)
}

fn estimate_lines(estimate: &ConsolidationEstimate) -> Vec<String> {
    let mut lines = vec![
        format!("Hub: {} ({})", estimate.hub_name, estimate.hub_key),
        format!(
            "Combined enrollment: {}",
            thousands(estimate.combined_enrollment)
        ),
        format!(
            "Combined spending:   {} ({} per pupil)",
            dollars(estimate.combined_spending),
            dollars(estimate.baseline_per_pupil)
        ),
        format!(
            "Admin savings:       {} ({} of spoke spending)",
            dollars(estimate.admin_savings),
            percent(estimate.admin_savings_share_of_spokes)
        ),
        format!(
            "Transportation:      {} ({} of spoke spending)",
            dollars(estimate.transportation_increase),
            percent(estimate.transportation_share_of_spokes)
        ),
        format!(
            "Net impact:          {} ({} of combined)",
            dollars(estimate.net_impact),
            percent(estimate.net_impact_share_of_combined)
        ),
        format!(
            "Projected spending:  {} ({} per pupil)",
            dollars(estimate.projected_spending),
            dollars(estimate.projected_per_pupil)
        ),
        String::new(),
        "Spokes:".to_string(),
    ];

    lines.extend(estimate.spoke_breakdown.iter().map(|spoke| {
        format!(
            "  {}: {} students, {:.1} mi, {}",
            spoke.name,
            thousands(spoke.enrollment),
            spoke.distance_miles,
            dollars(spoke.cost)
        )
    }));

    lines
}

fn missing_lines(missing: &MissingData) -> Vec<String> {
    let mut lines = vec!["No estimate.".to_string()];
    for (label, keys) in [
        ("budgets", &missing.budgets),
        ("enrollment", &missing.enrollment),
        ("anchors", &missing.anchors),
    ] {
        if !keys.is_empty() {
            lines.push(format!("Missing {label}: {}", join_keys(keys)));
        }
    }
    lines
}

fn join_keys(keys: &[DistrictKey]) -> String {
    keys.iter()
        .map(DistrictKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn dollars(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = rounded.abs() as u64;
    format!("{sign}${}", thousands(whole))
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use district_map_consolidation_models::{IncompleteEstimate, SpokeBreakdown};
    use district_map_normalize::district_key;

    use super::*;

    #[test]
    fn formats_dollars_with_separators() {
        assert_eq!(dollars(0.0), "$0");
        assert_eq!(dollars(999.4), "$999");
        assert_eq!(dollars(1_234_567.6), "$1,234,568");
        assert_eq!(dollars(-10_000.0), "-$10,000");
        assert_eq!(dollars(-0.2), "$0");
    }

    #[test]
    fn formats_thousands() {
        assert_eq!(thousands(7), "7");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(123_456_789), "123,456,789");
    }

    #[test]
    fn renders_missing_data() {
        let result = ConsolidationResult::Incomplete(IncompleteEstimate {
            missing: MissingData {
                budgets: vec![],
                enrollment: vec![district_key("Cranston"), district_key("Westerly")],
                anchors: vec![district_key("Cranston")],
            },
            warnings: vec!["Providence: admin_share_outlier".to_string()],
        });

        assert_eq!(
            render_result(&result),
            "No estimate.\n\
             Missing enrollment: cranston, westerly\n\
             Missing anchors: cranston\n\
             \n\
             Warnings:\n\
             \x20 - Providence: admin_share_outlier\n"
        );
    }

    #[test]
    fn renders_estimate_summary_and_spokes() {
        let estimate = ConsolidationEstimate {
            hub_key: district_key("Providence"),
            hub_name: "Providence".to_string(),
            combined_enrollment: 17_800,
            combined_spending: 360_000_000.0,
            hub_spending: 300_000_000.0,
            spokes_spending: 60_000_000.0,
            baseline_per_pupil: 20_224.7,
            admin_baseline_hub: 3_000_000.0,
            admin_baseline_spokes: 1_000_000.0,
            admin_savings: 500_000.0,
            transportation_increase: 1_710.0,
            net_impact: 498_290.0,
            projected_spending: 359_501_710.0,
            projected_per_pupil: 20_196.7,
            admin_savings_share_of_combined: 0.0014,
            transportation_share_of_combined: 0.0,
            net_impact_share_of_combined: 0.0014,
            admin_savings_share_of_spokes: 0.0083,
            transportation_share_of_spokes: 0.0,
            net_impact_share_of_spokes: 0.0083,
            spoke_breakdown: vec![SpokeBreakdown {
                key: district_key("Cranston"),
                name: "Cranston".to_string(),
                enrollment: 3_800,
                distance_miles: 1.8,
                cost: 1_710.0,
            }],
            warnings: vec![],
        };

        let text = render_result(&ConsolidationResult::Complete(estimate));

        assert!(text.starts_with("Hub: Providence (providence)\n"));
        assert!(text.contains("Combined enrollment: 17,800\n"));
        assert!(text.contains("Admin savings:       $500,000 (0.8% of spoke spending)\n"));
        assert!(text.contains("  Cranston: 3,800 students, 1.8 mi, $1,710\n"));
        assert!(!text.contains("Warnings:"));
    }

    #[test]
    fn renders_stats_gaps() {
        let mut missing = BTreeMap::new();
        missing.insert(DatasetKind::Budgets, vec![district_key("Westerly")]);
        missing.insert(DatasetKind::Enrollment, vec![]);
        let stats = DatasetStats {
            budgets: 2,
            enrollments: 2,
            anchors: 3,
            complete: 2,
            missing,
        };

        let text = render_stats(&stats);

        assert!(text.contains("Complete:    2\n"));
        assert!(text.contains("Missing from budgets.json (1): westerly\n"));
        assert!(!text.contains("lea_enrollment.json"));
    }
}
