//! Joins selected district keys against the three datasets.

use district_map_consolidation_models::MissingData;
use district_map_district_models::{
    BudgetsMap, DistrictAnchor, DistrictAnchorsMap, DistrictBudget, DistrictEnrollment,
    DistrictKey, LeaEnrollmentMap,
};

/// Borrowed view over the budgets, enrollment, and anchors datasets.
#[derive(Debug, Clone, Copy)]
pub struct DistrictData<'a> {
    pub budgets: &'a BudgetsMap,
    pub enrollments: &'a LeaEnrollmentMap,
    pub anchors: &'a DistrictAnchorsMap,
}

impl<'a> DistrictData<'a> {
    #[must_use]
    pub const fn new(
        budgets: &'a BudgetsMap,
        enrollments: &'a LeaEnrollmentMap,
        anchors: &'a DistrictAnchorsMap,
    ) -> Self {
        Self {
            budgets,
            enrollments,
            anchors,
        }
    }

    /// Looks up every key in every dataset.
    ///
    /// A key counts as missing from enrollment when it has no entry or its
    /// total is zero. Missing lists keep the order of `keys`.
    #[must_use]
    pub fn join(&self, keys: &[DistrictKey]) -> JoinReport<'a> {
        let mut report = JoinReport::default();

        for key in keys {
            let budget = self.budgets.get(key);
            let enrollment = self
                .enrollments
                .get(key)
                .filter(|enrollment| enrollment.has_students());
            let anchor = self.anchors.get(key);

            if budget.is_none() {
                report.missing.budgets.push(key.clone());
            }
            if enrollment.is_none() {
                report.missing.enrollment.push(key.clone());
            }
            if anchor.is_none() {
                report.missing.anchors.push(key.clone());
            }

            if let (Some(budget), Some(enrollment), Some(anchor)) = (budget, enrollment, anchor) {
                report.districts.push(JoinedDistrict {
                    key: key.clone(),
                    budget,
                    enrollment,
                    anchor,
                });
            }
        }

        report
    }
}

/// One district present in all three datasets.
#[derive(Debug, Clone)]
pub struct JoinedDistrict<'a> {
    pub key: DistrictKey,
    pub budget: &'a DistrictBudget,
    pub enrollment: &'a DistrictEnrollment,
    pub anchor: &'a DistrictAnchor,
}

impl JoinedDistrict<'_> {
    /// See [`display_name`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.key, Some(self.budget), Some(self.anchor))
    }
}

/// Budget display name, else anchor name, else the key. Blank names are
/// skipped.
#[must_use]
pub fn display_name<'a>(
    key: &'a DistrictKey,
    budget: Option<&'a DistrictBudget>,
    anchor: Option<&'a DistrictAnchor>,
) -> &'a str {
    let anchor_name = anchor
        .map(|anchor| anchor.name.trim())
        .filter(|name| !name.is_empty());
    let fallback = anchor_name.unwrap_or_else(|| key.as_str());
    budget.map_or(fallback, |budget| budget.display_name_or(fallback))
}

#[derive(Debug, Clone, Default)]
pub struct JoinReport<'a> {
    /// Fully joined districts, in selection order.
    pub districts: Vec<JoinedDistrict<'a>>,
    pub missing: MissingData,
}

impl JoinReport<'_> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_data::{TestData, anchor, budget, enrollment};
    use district_map_normalize::district_key;

    #[test]
    fn joins_districts_present_everywhere() {
        let mut data = TestData::default();
        data.add("Providence", budget("Providence", 1_000_000.0, 50_000.0), enrollment(10_000), anchor(42.6, -71.3));
        data.add("Cranston", budget("Cranston", 400_000.0, 20_000.0), enrollment(2_000), anchor(42.7, -71.3));

        let keys = [district_key("Providence"), district_key("Cranston")];
        let report = data.view().join(&keys);

        assert!(report.is_complete());
        let joined: Vec<&str> = report.districts.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(joined, ["providence", "cranston"]);
    }

    #[test]
    fn reports_missing_entries_per_dataset_in_selection_order() {
        let mut data = TestData::default();
        data.add("Providence", budget("Providence", 1_000_000.0, 50_000.0), enrollment(10_000), anchor(42.6, -71.3));
        data.budgets.insert(district_key("Cranston"), budget("Cranston", 1.0, 0.0));
        data.anchors.insert(district_key("Westerly"), anchor(42.7, -71.4));

        let keys = [
            district_key("Westerly"),
            district_key("Providence"),
            district_key("Cranston"),
        ];
        let report = data.view().join(&keys);

        assert!(!report.is_complete());
        assert_eq!(report.missing.budgets, [district_key("Westerly")]);
        assert_eq!(
            report.missing.enrollment,
            [district_key("Westerly"), district_key("Cranston")]
        );
        assert_eq!(report.missing.anchors, [district_key("Cranston")]);
        assert_eq!(report.districts.len(), 1);
    }

    #[test]
    fn zero_enrollment_counts_as_missing() {
        let mut data = TestData::default();
        data.add("Empty", budget("Empty", 1.0, 0.0), enrollment(0), anchor(42.0, -71.0));

        let report = data.view().join(&[district_key("Empty")]);
        assert_eq!(report.missing.enrollment, [district_key("Empty")]);
        assert!(report.missing.budgets.is_empty());
        assert!(report.districts.is_empty());
    }

    #[test]
    fn display_name_falls_back_to_anchor_then_key() {
        let mut data = TestData::default();
        let mut named_anchor = anchor(42.0, -71.0);
        named_anchor.name = "Providence High".to_string();
        data.add("Providence", budget("", 1.0, 0.0), enrollment(1), named_anchor);
        data.add("Cranston", budget("  ", 1.0, 0.0), enrollment(1), anchor(42.0, -71.0));
        data.add("Tiverton", budget("Tiverton Public Schools", 1.0, 0.0), enrollment(1), anchor(42.0, -71.0));

        let keys = [
            district_key("Providence"),
            district_key("Cranston"),
            district_key("Tiverton"),
        ];
        let report = data.view().join(&keys);
        let names: Vec<&str> = report.districts.iter().map(JoinedDistrict::display_name).collect();
        assert_eq!(names, ["Providence High", "cranston", "Tiverton Public Schools"]);
    }
}
