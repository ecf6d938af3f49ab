#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the district map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the dataset record types to allow independent evolution of the API
//! contract.

use district_map_consolidation_models::ConsolidationParams;
use district_map_district_models::{
    DistrictAnchor, DistrictBudget, DistrictEnrollment, DistrictKey,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of districts usable in an estimate.
    pub complete_districts: usize,
}

/// One row of the district list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistrictSummary {
    pub key: DistrictKey,
    /// Budget display name, else anchor name, else the key.
    pub name: String,
    /// Enrollment total, when an enrollment record exists.
    pub enrollment: Option<u64>,
    pub has_budget: bool,
    pub has_enrollment: bool,
    pub has_anchor: bool,
}

impl ApiDistrictSummary {
    /// Whether the district can take part in an estimate.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_budget && self.has_anchor && self.enrollment.is_some_and(|total| total > 0)
    }
}

/// All records for a single district.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistrictDetail {
    pub key: DistrictKey,
    pub name: String,
    pub budget: Option<DistrictBudget>,
    pub enrollment: Option<DistrictEnrollment>,
    pub anchor: Option<DistrictAnchor>,
}

/// Query parameters for the key lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyQueryParams {
    /// Free-text district name.
    pub name: String,
    /// Optional school name; when present a school key is returned too.
    pub school: Option<String>,
}

/// Response from the key lookup endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyLookup {
    /// The name as submitted.
    pub name: String,
    pub key: DistrictKey,
    pub school_key: Option<String>,
    /// Whether the school name matches a charter pattern. Charter schools
    /// are not part of any district.
    pub charter_school: Option<bool>,
    /// Whether any dataset has a record under `key`.
    pub known: bool,
}

/// Body of `POST /api/consolidation`.
///
/// Omitted parameters take their defaults. Out-of-range values are clamped
/// by the estimator rather than rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationRequest {
    /// District names or keys.
    pub districts: Vec<String>,
    pub admin_reduction_rate: Option<f64>,
    pub affected_share: Option<f64>,
    pub cost_per_student_mile: Option<f64>,
}

impl ConsolidationRequest {
    /// Estimator parameters, with defaults filled in.
    #[must_use]
    pub fn params(&self) -> ConsolidationParams {
        ConsolidationParams::with_overrides(
            self.admin_reduction_rate,
            self.affected_share,
            self.cost_per_student_mile,
        )
    }
}
