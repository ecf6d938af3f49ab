#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parameters and results of a consolidation estimate.
//!
//! A [`ConsolidationResult`] serializes as a flat camelCase object with an
//! `ok` discriminator: `ok: false` carries the missing-data lists, `ok: true`
//! carries every headline figure and the per-spoke breakdown.

pub use district_map_normalize::DistrictKey;
use serde::{Deserialize, Serialize, Serializer};

/// Smallest number of distinct districts an estimate can be run for.
pub const MIN_SELECTION: usize = 2;

/// Warning returned when fewer than [`MIN_SELECTION`] districts are selected.
pub const INSUFFICIENT_SELECTION_WARNING: &str = "Select at least 2 districts";

/// Spoke-to-hub distances above this many miles get a plausibility warning.
pub const DISTANCE_WARNING_MILES: f64 = 60.0;

/// User-adjustable inputs to the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsolidationParams {
    /// Fraction of spoke central-administration cost eliminated, in `[0, 1]`.
    pub admin_reduction_rate: f64,
    /// Fraction of spoke students who take a longer bus ride, in `[0, 1]`.
    pub affected_share: f64,
    /// Dollars per student per mile of added travel, `>= 0`.
    pub cost_per_student_mile: f64,
}

impl Default for ConsolidationParams {
    fn default() -> Self {
        Self {
            admin_reduction_rate: 0.5,
            affected_share: 0.25,
            cost_per_student_mile: 1.0,
        }
    }
}

impl ConsolidationParams {
    /// Defaults with any supplied values layered on top.
    #[must_use]
    pub fn with_overrides(
        admin_reduction_rate: Option<f64>,
        affected_share: Option<f64>,
        cost_per_student_mile: Option<f64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            admin_reduction_rate: admin_reduction_rate.unwrap_or(defaults.admin_reduction_rate),
            affected_share: affected_share.unwrap_or(defaults.affected_share),
            cost_per_student_mile: cost_per_student_mile.unwrap_or(defaults.cost_per_student_mile),
        }
    }

    /// Returns a copy with every field forced into its valid range.
    ///
    /// NaN is treated as 0 before clamping.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            admin_reduction_rate: clamp_unit(self.admin_reduction_rate),
            affected_share: clamp_unit(self.affected_share),
            cost_per_student_mile: clamp_non_negative(self.cost_per_student_mile),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

/// Selected keys absent from each dataset, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingData {
    /// Keys with no budget record.
    pub budgets: Vec<DistrictKey>,
    /// Keys with no enrollment entry or a zero total.
    pub enrollment: Vec<DistrictKey>,
    /// Keys with no anchor point.
    pub anchors: Vec<DistrictKey>,
}

impl MissingData {
    /// Whether every selected key was found in every dataset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty() && self.enrollment.is_empty() && self.anchors.is_empty()
    }
}

/// Why an estimate could not be produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteEstimate {
    /// Selected keys absent from each dataset.
    pub missing: MissingData,
    /// Selection and budget-flag warnings.
    pub warnings: Vec<String>,
}

/// Added transportation cost for one spoke district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokeBreakdown {
    /// Spoke district key.
    pub key: DistrictKey,
    /// Spoke display name.
    pub name: String,
    /// Spoke enrollment total.
    pub enrollment: u64,
    /// Rounded to 0.1 mile.
    pub distance_miles: f64,
    /// Rounded to whole dollars.
    pub cost: f64,
}

/// A completed what-if estimate. Headline figures are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationEstimate {
    /// The selected district with the largest enrollment.
    pub hub_key: DistrictKey,
    /// Hub display name.
    pub hub_name: String,
    /// Enrollment across every selected district.
    pub combined_enrollment: u64,
    /// Total expenditures across every selected district.
    pub combined_spending: f64,
    /// Hub total expenditures.
    pub hub_spending: f64,
    /// `combined_spending - hub_spending`.
    pub spokes_spending: f64,
    /// `combined_spending / combined_enrollment`.
    pub baseline_per_pupil: f64,
    /// Hub modeled central administration.
    pub admin_baseline_hub: f64,
    /// Modeled central administration summed over the spokes.
    pub admin_baseline_spokes: f64,
    /// `admin_reduction_rate * admin_baseline_spokes`.
    pub admin_savings: f64,
    /// Added busing cost summed over the spokes.
    pub transportation_increase: f64,
    /// `admin_savings - transportation_increase`. Positive means savings.
    pub net_impact: f64,
    /// `combined_spending - net_impact`.
    pub projected_spending: f64,
    /// `projected_spending / combined_enrollment`.
    pub projected_per_pupil: f64,
    /// `admin_savings / combined_spending`, 0 when there is no spending.
    pub admin_savings_share_of_combined: f64,
    /// `transportation_increase / combined_spending`.
    pub transportation_share_of_combined: f64,
    /// `net_impact / combined_spending`.
    pub net_impact_share_of_combined: f64,
    /// `admin_savings / spokes_spending`, 0 when spokes spend nothing.
    pub admin_savings_share_of_spokes: f64,
    /// `transportation_increase / spokes_spending`.
    pub transportation_share_of_spokes: f64,
    /// `net_impact / spokes_spending`.
    pub net_impact_share_of_spokes: f64,
    /// Sorted by cost, highest first.
    pub spoke_breakdown: Vec<SpokeBreakdown>,
    /// Budget-flag and distance warnings.
    pub warnings: Vec<String>,
}

/// Outcome of an estimate request.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsolidationResult {
    /// Too few districts, or a selected district lacks data.
    Incomplete(IncompleteEstimate),
    /// Every selected district joined.
    Complete(ConsolidationEstimate),
}

impl ConsolidationResult {
    /// Builds the result for a selection with too few distinct districts.
    #[must_use]
    pub fn insufficient_selection() -> Self {
        Self::Incomplete(IncompleteEstimate {
            missing: MissingData::default(),
            warnings: vec![INSUFFICIENT_SELECTION_WARNING.to_string()],
        })
    }

    /// Whether an estimate was produced.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Incomplete(incomplete) => &incomplete.warnings,
            Self::Complete(estimate) => &estimate.warnings,
        }
    }

    #[must_use]
    pub const fn missing(&self) -> Option<&MissingData> {
        match self {
            Self::Incomplete(incomplete) => Some(&incomplete.missing),
            Self::Complete(_) => None,
        }
    }

    #[must_use]
    pub const fn estimate(&self) -> Option<&ConsolidationEstimate> {
        match self {
            Self::Incomplete(_) => None,
            Self::Complete(estimate) => Some(estimate),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    ok: bool,
    #[serde(flatten)]
    body: &'a T,
}

impl Serialize for ConsolidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Incomplete(body) => Tagged { ok: false, body }.serialize(serializer),
            Self::Complete(body) => Tagged { ok: true, body }.serialize(serializer),
        }
    }
}
