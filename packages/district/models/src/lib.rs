#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-district record types.
//!
//! Each dataset (budgets, enrollment, anchors) is a JSON object keyed by
//! [`DistrictKey`]. The records here mirror those documents and know how
//! to validate themselves, so malformed data is rejected when it is loaded
//! rather than at every use site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

pub use district_map_normalize::DistrictKey;

/// District key -> budget record.
pub type BudgetsMap = BTreeMap<DistrictKey, DistrictBudget>;
/// District key -> enrollment record.
pub type LeaEnrollmentMap = BTreeMap<DistrictKey, DistrictEnrollment>;
/// District key -> anchor record.
pub type DistrictAnchorsMap = BTreeMap<DistrictKey, DistrictAnchor>;

/// Error returned when a record fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidRecordError {
    /// The offending field, in its JSON spelling.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl InvalidRecordError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Record-level validation applied after deserialization.
pub trait Validate {
    /// Checks invariants that the type system does not enforce.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn validate(&self) -> Result<(), InvalidRecordError>;
}

fn require_finite(field: &'static str, value: f64) -> Result<(), InvalidRecordError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidRecordError::new(field, format!("{value} is not finite")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), InvalidRecordError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(InvalidRecordError::new(field, format!("{value} is negative")));
    }
    Ok(())
}

/// A district's budget for one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictBudget {
    /// District name as printed in the budget source.
    #[serde(default)]
    pub display_name: String,
    /// Fiscal year label (e.g. "FY2024").
    #[serde(default)]
    pub fiscal_year: String,
    /// Total expenditures in dollars. `0` means unknown.
    pub total_expenditures: f64,
    /// Raw district-management spend as extracted.
    #[serde(default)]
    pub district_management: f64,
    /// Raw program/operations-management spend as extracted.
    #[serde(default)]
    pub program_operations_management: f64,
    /// Sum of the two raw components.
    pub central_administration_raw: f64,
    /// Central administration with negatives clamped and outliers capped.
    /// This is the figure used for projections.
    pub central_administration_model: f64,
    /// Raw admin spend / total expenditures. `None` when total is 0.
    pub admin_share_raw: Option<f64>,
    /// Modeled admin spend / total expenditures. `None` when total is 0.
    pub admin_share_model: Option<f64>,
    /// Data-quality flags raised while extracting this record.
    #[serde(default)]
    pub flags: Vec<String>,
}

impl DistrictBudget {
    /// Returns the display name, or `fallback` when it is blank.
    #[must_use]
    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let name = self.display_name.trim();
        if name.is_empty() { fallback } else { name }
    }
}

impl Validate for DistrictBudget {
    fn validate(&self) -> Result<(), InvalidRecordError> {
        require_non_negative("totalExpenditures", self.total_expenditures)?;
        require_finite("districtManagement", self.district_management)?;
        require_finite("programOperationsManagement", self.program_operations_management)?;
        require_finite("centralAdministrationRaw", self.central_administration_raw)?;
        require_non_negative("centralAdministrationModel", self.central_administration_model)?;
        if let Some(share) = self.admin_share_raw {
            require_finite("adminShareRaw", share)?;
        }
        if let Some(share) = self.admin_share_model {
            require_finite("adminShareModel", share)?;
        }
        Ok(())
    }
}

/// Counts by demographic category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demographics {
    /// Race/ethnicity category -> student count.
    pub race_ethnicity: BTreeMap<String, u64>,
    /// Gender category -> student count.
    pub gender: BTreeMap<String, u64>,
}

/// A district's (LEA's) enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictEnrollment {
    /// Total enrolled students.
    pub total: u64,
    /// Elementary sub-total.
    pub elementary: Option<u64>,
    /// Secondary sub-total.
    pub secondary: Option<u64>,
    /// Students eligible for free or reduced-price lunch.
    pub free_reduced_lunch: Option<u64>,
    /// Limited-English-proficiency students.
    pub limited_english: Option<u64>,
    /// Students with an individualized education program.
    pub iep: Option<u64>,
    /// Students in vocational programs.
    pub vocational: Option<u64>,
    /// Demographic breakdown.
    pub demographics: Option<Demographics>,
}

impl DistrictEnrollment {
    /// A district only counts as having enrollment when `total > 0`.
    #[must_use]
    pub const fn has_students(&self) -> bool {
        self.total > 0
    }
}

impl Validate for DistrictEnrollment {
    fn validate(&self) -> Result<(), InvalidRecordError> {
        if self.total == 0 {
            return Ok(());
        }
        let subtotals = [
            ("elementary", self.elementary),
            ("secondary", self.secondary),
            ("freeReducedLunch", self.free_reduced_lunch),
            ("limitedEnglish", self.limited_english),
            ("iep", self.iep),
            ("vocational", self.vocational),
        ];
        for (field, value) in subtotals {
            if let Some(value) = value.filter(|v| *v > self.total) {
                return Err(InvalidRecordError::new(
                    field,
                    format!("{value} exceeds total enrollment {}", self.total),
                ));
            }
        }
        Ok(())
    }
}

/// Where a district's anchor point came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnchorType {
    /// The district's largest public high school.
    HighSchool,
    /// An elementary school, used when there is no high school.
    ElementarySchool,
    /// An interior point of the district polygon.
    Fallback,
}

/// The school an anchor point was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorSchool {
    /// School name.
    pub name: String,
    /// School identifier from the source dataset.
    pub id: String,
    /// School enrollment, when known.
    pub enrollment: Option<u64>,
    /// Grade range label (e.g. "09-12").
    pub grade_range: Option<String>,
    /// Grade bucket (e.g. "high").
    pub grade_bucket: Option<String>,
}

/// A district's representative point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictAnchor {
    /// Latitude in WGS84 degrees.
    pub lat: f64,
    /// Longitude in WGS84 degrees.
    pub lon: f64,
    /// Displayable district name.
    pub name: String,
    /// How the point was chosen.
    pub anchor_type: AnchorType,
    /// Source school, absent for fallback anchors.
    pub school: Option<AnchorSchool>,
}

impl DistrictAnchor {
    /// Returns `(lat, lon)`.
    #[must_use]
    pub const fn lat_lon(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl Validate for DistrictAnchor {
    fn validate(&self) -> Result<(), InvalidRecordError> {
        require_finite("lat", self.lat)?;
        require_finite("lon", self.lon)?;
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidRecordError::new("lat", format!("{} out of range", self.lat)));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(InvalidRecordError::new("lon", format!("{} out of range", self.lon)));
        }
        if self.anchor_type != AnchorType::Fallback && self.school.is_none() {
            return Err(InvalidRecordError::new(
                "school",
                format!("required for {} anchors", self.anchor_type),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> DistrictBudget {
        serde_json::from_str(
            r#"{
                "displayName": "Providence",
                "fiscalYear": "FY2024",
                "totalExpenditures": 1000000.0,
                "districtManagement": 30000.0,
                "programOperationsManagement": 20000.0,
                "centralAdministrationRaw": 50000.0,
                "centralAdministrationModel": 50000.0,
                "adminShareRaw": 0.05,
                "adminShareModel": 0.05,
                "flags": ["admin_share_outlier"]
            }"#,
        )
        .unwrap()
    }

    fn anchor(anchor_type: AnchorType, school: Option<AnchorSchool>) -> DistrictAnchor {
        DistrictAnchor {
            lat: 42.64,
            lon: -71.31,
            name: "Providence".to_string(),
            anchor_type,
            school,
        }
    }

    #[test]
    fn budget_parses_camel_case() {
        let b = budget();
        assert_eq!(b.display_name, "Providence");
        assert!((b.central_administration_model - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(b.flags, vec!["admin_share_outlier"]);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn budget_nullable_shares() {
        let b: DistrictBudget = serde_json::from_str(
            r#"{
                "totalExpenditures": 0,
                "centralAdministrationRaw": 0,
                "centralAdministrationModel": 0,
                "adminShareRaw": null,
                "adminShareModel": null
            }"#,
        )
        .unwrap();
        assert_eq!(b.admin_share_raw, None);
        assert!(b.flags.is_empty());
        assert!(b.validate().is_ok());
    }

    #[test]
    fn budget_requires_model_field() {
        let result: Result<DistrictBudget, _> = serde_json::from_str(
            r#"{"totalExpenditures": 1, "centralAdministrationRaw": 0, "adminShareRaw": null, "adminShareModel": null}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn budget_rejects_negative_total() {
        let mut b = budget();
        b.total_expenditures = -1.0;
        assert_eq!(b.validate().unwrap_err().field, "totalExpenditures");
    }

    #[test]
    fn budget_rejects_negative_model() {
        let mut b = budget();
        b.central_administration_model = -5.0;
        assert_eq!(b.validate().unwrap_err().field, "centralAdministrationModel");
    }

    #[test]
    fn budget_display_name_fallback() {
        let mut b = budget();
        assert_eq!(b.display_name_or("providence"), "Providence");
        b.display_name = "  ".to_string();
        assert_eq!(b.display_name_or("providence"), "providence");
    }

    #[test]
    fn enrollment_rejects_negative_total() {
        let result: Result<DistrictEnrollment, _> = serde_json::from_str(r#"{"total": -3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn enrollment_subtotal_cannot_exceed_total() {
        let e = DistrictEnrollment {
            total: 100,
            iep: Some(101),
            ..DistrictEnrollment::default()
        };
        assert_eq!(e.validate().unwrap_err().field, "iep");
    }

    #[test]
    fn enrollment_with_demographics() {
        let e: DistrictEnrollment = serde_json::from_str(
            r#"{
                "total": 500,
                "elementary": 300,
                "secondary": 200,
                "demographics": {"raceEthnicity": {"hispanic": 120}, "gender": {"female": 250}}
            }"#,
        )
        .unwrap();
        assert!(e.has_students());
        assert!(e.validate().is_ok());
        let demographics = e.demographics.unwrap();
        assert_eq!(demographics.race_ethnicity.get("hispanic"), Some(&120));
        assert_eq!(demographics.gender.get("female"), Some(&250));
    }

    #[test]
    fn zero_enrollment_has_no_students() {
        assert!(!DistrictEnrollment::default().has_students());
    }

    #[test]
    fn anchor_type_round_trips_snake_case() {
        assert_eq!(AnchorType::HighSchool.to_string(), "high_school");
        assert_eq!(
            "elementary_school".parse::<AnchorType>().unwrap(),
            AnchorType::ElementarySchool
        );
        let json = serde_json::to_string(&AnchorType::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
    }

    #[test]
    fn fallback_anchor_needs_no_school() {
        assert!(anchor(AnchorType::Fallback, None).validate().is_ok());
    }

    #[test]
    fn school_anchor_requires_school() {
        let err = anchor(AnchorType::HighSchool, None).validate().unwrap_err();
        assert_eq!(err.field, "school");
        assert!(err.reason.contains("high_school"));
    }

    #[test]
    fn anchor_rejects_out_of_range_coordinates() {
        let mut a = anchor(AnchorType::Fallback, None);
        a.lat = 91.0;
        assert_eq!(a.validate().unwrap_err().field, "lat");
        a.lat = 42.0;
        a.lon = f64::NAN;
        assert_eq!(a.validate().unwrap_err().field, "lon");
    }

    #[test]
    fn anchor_parses_with_school() {
        let a: DistrictAnchor = serde_json::from_str(
            r#"{
                "lat": 42.64, "lon": -71.31, "name": "Providence",
                "anchorType": "high_school",
                "school": {"name": "Providence High", "id": "01600505", "enrollment": 3100,
                           "gradeRange": "09-12", "gradeBucket": "high"}
            }"#,
        )
        .unwrap();
        assert_eq!(a.anchor_type, AnchorType::HighSchool);
        assert_eq!(a.school.as_ref().map(|s| s.id.as_str()), Some("01600505"));
        assert!(a.validate().is_ok());
    }
}
