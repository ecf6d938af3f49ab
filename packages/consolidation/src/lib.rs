#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! What-if estimates for merging school districts.
//!
//! Selected district keys are joined against the budgets, enrollment, and
//! anchors datasets, then run through the hub-and-spoke estimator. Pure
//! and synchronous: nothing here does I/O.

pub mod estimator;
pub mod join;

#[cfg(test)]
mod test_data;

pub use district_map_consolidation_models as models;
pub use estimator::compute;
pub use join::{DistrictData, JoinReport, JoinedDistrict};

use district_map_consolidation_models::{ConsolidationParams, ConsolidationResult};
use district_map_district_models::{BudgetsMap, DistrictAnchorsMap, DistrictKey, LeaEnrollmentMap};
use district_map_normalize::KeyNormalizer;

/// Runs [`compute`] over the three datasets directly.
#[must_use]
pub fn compute_consolidation(
    selected: &[DistrictKey],
    budgets: &BudgetsMap,
    enrollments: &LeaEnrollmentMap,
    anchors: &DistrictAnchorsMap,
    params: &ConsolidationParams,
) -> ConsolidationResult {
    compute(
        selected,
        &DistrictData::new(budgets, enrollments, anchors),
        params,
    )
}

/// Maps free-text district names (or existing keys) to district keys.
///
/// Alias targets are never themselves aliased, so passing a key through
/// again is a no-op.
#[must_use]
pub fn select_districts<S: AsRef<str>>(
    normalizer: &KeyNormalizer,
    names: &[S],
) -> Vec<DistrictKey> {
    names
        .iter()
        .map(|name| normalizer.district_key(name.as_ref()))
        .filter(|key| !key.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{TestData, anchor, budget, enrollment};

    #[test]
    fn selects_keys_from_names() {
        let normalizer = KeyNormalizer::with_defaults();
        let keys = select_districts(
            &normalizer,
            &["Providence Public Schools", "  ", "Exeter-West Greenwich Regional School District"],
        );
        let keys: Vec<&str> = keys.iter().map(DistrictKey::as_str).collect();
        assert_eq!(keys, ["providence", "exeter west greenwich"]);
    }

    #[test]
    fn selecting_keys_is_stable() {
        let normalizer = KeyNormalizer::with_defaults();
        let once = select_districts(
            &normalizer,
            &["Bristol Warren Regional", "Foster-Glocester Regional", "EWG Regional", "Cranston"],
        );
        let names: Vec<&str> = once.iter().map(DistrictKey::as_str).collect();
        let again = select_districts(&normalizer, &names);
        assert_eq!(once, again);
        assert_eq!(names, ["bristol warren", "foster glocester", "exeter west greenwich", "cranston"]);
    }

    #[test]
    fn compute_consolidation_matches_compute() {
        let mut data = TestData::default();
        data.add("Providence", budget("Providence", 1_000_000.0, 50_000.0), enrollment(10_000), anchor(42.64, -71.32));
        data.add("Cranston", budget("Cranston", 400_000.0, 20_000.0), enrollment(2_000), anchor(42.67, -71.30));

        let normalizer = KeyNormalizer::with_defaults();
        let selected = select_districts(&normalizer, &["Providence", "Cranston"]);
        let params = ConsolidationParams::default();

        let direct = compute_consolidation(
            &selected,
            &data.budgets,
            &data.enrollments,
            &data.anchors,
            &params,
        );
        assert_eq!(direct, compute(&selected, &data.view(), &params));
        assert!(direct.is_ok());
    }
}
