//! The hub-and-spoke consolidation estimate.
//!
//! The largest selected district becomes the hub. Every other district is a
//! spoke whose central administration is partly eliminated and whose
//! students partly travel to the hub.

use district_map_consolidation_models::{
    ConsolidationEstimate, ConsolidationParams, ConsolidationResult, DISTANCE_WARNING_MILES,
    IncompleteEstimate, MIN_SELECTION, SpokeBreakdown,
};
use district_map_district_models::DistrictKey;
use district_map_spatial::miles_between_coords;

use crate::join::{DistrictData, JoinedDistrict, display_name};

/// Estimates the effect of merging `selected` districts.
///
/// Never fails: too few districts or incomplete data yield an
/// [`ConsolidationResult::Incomplete`] with warnings and missing lists.
#[must_use]
pub fn compute(
    selected: &[DistrictKey],
    data: &DistrictData<'_>,
    params: &ConsolidationParams,
) -> ConsolidationResult {
    let params = params.clamped();
    let keys = dedupe(selected);

    if keys.len() < MIN_SELECTION {
        return ConsolidationResult::insufficient_selection();
    }

    let mut warnings = budget_flag_warnings(&keys, data);
    let report = data.join(&keys);

    if !report.is_complete() {
        log::debug!(
            "Incomplete data for {} district(s): {} budget, {} enrollment, {} anchor gap(s)",
            keys.len(),
            report.missing.budgets.len(),
            report.missing.enrollment.len(),
            report.missing.anchors.len(),
        );
        return ConsolidationResult::Incomplete(IncompleteEstimate {
            missing: report.missing,
            warnings,
        });
    }

    let districts = report.districts;
    let hub_index = hub_index(&districts);
    let hub = &districts[hub_index];
    let spokes: Vec<&JoinedDistrict<'_>> = districts
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != hub_index)
        .map(|(_, district)| district)
        .collect();

    let combined_enrollment = districts
        .iter()
        .fold(0_u64, |sum, d| sum.saturating_add(d.enrollment.total));
    let combined_spending: f64 = districts.iter().map(|d| d.budget.total_expenditures).sum();
    let hub_spending = hub.budget.total_expenditures;
    let spokes_spending = combined_spending - hub_spending;
    let baseline_per_pupil = per_pupil(combined_spending, combined_enrollment);

    let admin_baseline_hub = hub.budget.central_administration_model;
    let admin_baseline_spokes: f64 = spokes
        .iter()
        .map(|spoke| spoke.budget.central_administration_model)
        .sum();
    let admin_savings = params.admin_reduction_rate * admin_baseline_spokes;

    let hub_coords = hub.anchor.lat_lon();
    let mut transportation_increase = 0.0;
    let mut spoke_breakdown = Vec::with_capacity(spokes.len());

    for spoke in &spokes {
        let distance = miles_between_coords(spoke.anchor.lat_lon(), hub_coords);
        if distance > DISTANCE_WARNING_MILES {
            warnings.push(format!(
                "{} is {distance:.1} miles from {}; check anchor data",
                spoke.display_name(),
                hub.display_name(),
            ));
        }

        #[allow(clippy::cast_precision_loss)]
        let students = spoke.enrollment.total as f64;
        let cost = distance * students * params.affected_share * params.cost_per_student_mile;
        transportation_increase += cost;

        spoke_breakdown.push(SpokeBreakdown {
            key: spoke.key.clone(),
            name: spoke.display_name().to_string(),
            enrollment: spoke.enrollment.total,
            distance_miles: (distance * 10.0).round() / 10.0,
            cost: cost.round(),
        });
    }

    spoke_breakdown.sort_by(|a, b| b.cost.total_cmp(&a.cost));

    let net_impact = admin_savings - transportation_increase;
    let projected_spending = combined_spending - net_impact;
    let projected_per_pupil = per_pupil(projected_spending, combined_enrollment);

    log::debug!(
        "Consolidation into {}: savings={admin_savings:.0} transportation={transportation_increase:.0} net={net_impact:.0}",
        hub.key,
    );

    ConsolidationResult::Complete(ConsolidationEstimate {
        hub_key: hub.key.clone(),
        hub_name: hub.display_name().to_string(),
        combined_enrollment,
        combined_spending,
        hub_spending,
        spokes_spending,
        baseline_per_pupil,
        admin_baseline_hub,
        admin_baseline_spokes,
        admin_savings,
        transportation_increase,
        net_impact,
        projected_spending,
        projected_per_pupil,
        admin_savings_share_of_combined: share(admin_savings, combined_spending),
        transportation_share_of_combined: share(transportation_increase, combined_spending),
        net_impact_share_of_combined: share(net_impact, combined_spending),
        admin_savings_share_of_spokes: share(admin_savings, spokes_spending),
        transportation_share_of_spokes: share(transportation_increase, spokes_spending),
        net_impact_share_of_spokes: share(net_impact, spokes_spending),
        spoke_breakdown,
        warnings,
    })
}

/// Drops repeated keys, keeping first occurrences in order.
fn dedupe(selected: &[DistrictKey]) -> Vec<DistrictKey> {
    let mut keys: Vec<DistrictKey> = Vec::with_capacity(selected.len());
    for key in selected {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}

/// `"<name>: <flag>"` for every flag on every selected budget.
fn budget_flag_warnings(keys: &[DistrictKey], data: &DistrictData<'_>) -> Vec<String> {
    keys.iter()
        .filter_map(|key| data.budgets.get(key).map(|budget| (key, budget)))
        .flat_map(|(key, budget)| {
            let name = display_name(key, Some(budget), data.anchors.get(key));
            budget.flags.iter().map(move |flag| format!("{name}: {flag}"))
        })
        .collect()
}

/// Index of the strictly largest enrollment; ties keep the earliest.
fn hub_index(districts: &[JoinedDistrict<'_>]) -> usize {
    districts
        .iter()
        .enumerate()
        .fold(0, |best, (i, district)| {
            if district.enrollment.total > districts[best].enrollment.total {
                i
            } else {
                best
            }
        })
}

#[allow(clippy::cast_precision_loss)]
fn per_pupil(spending: f64, enrollment: u64) -> f64 {
    if enrollment == 0 {
        0.0
    } else {
        spending / enrollment as f64
    }
}

#[allow(clippy::float_cmp)]
fn share(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
