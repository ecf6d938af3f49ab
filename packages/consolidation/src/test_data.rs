use district_map_district_models::{
    AnchorType, BudgetsMap, DistrictAnchor, DistrictAnchorsMap, DistrictBudget,
    DistrictEnrollment, LeaEnrollmentMap,
};
use district_map_normalize::district_key;

use crate::DistrictData;

#[derive(Debug, Default)]
pub struct TestData {
    pub budgets: BudgetsMap,
    pub enrollments: LeaEnrollmentMap,
    pub anchors: DistrictAnchorsMap,
}

impl TestData {
    pub fn add(
        &mut self,
        name: &str,
        budget: DistrictBudget,
        enrollment: DistrictEnrollment,
        anchor: DistrictAnchor,
    ) {
        let key = district_key(name);
        self.budgets.insert(key.clone(), budget);
        self.enrollments.insert(key.clone(), enrollment);
        self.anchors.insert(key, anchor);
    }

    pub const fn view(&self) -> DistrictData<'_> {
        DistrictData::new(&self.budgets, &self.enrollments, &self.anchors)
    }
}

pub fn budget(name: &str, total: f64, admin: f64) -> DistrictBudget {
    DistrictBudget {
        display_name: name.to_string(),
        fiscal_year: "FY2024".to_string(),
        total_expenditures: total,
        district_management: admin,
        program_operations_management: 0.0,
        central_administration_raw: admin,
        central_administration_model: admin,
        admin_share_raw: None,
        admin_share_model: None,
        flags: vec![],
    }
}

pub fn enrollment(total: u64) -> DistrictEnrollment {
    DistrictEnrollment {
        total,
        ..DistrictEnrollment::default()
    }
}

pub fn anchor(lat: f64, lon: f64) -> DistrictAnchor {
    DistrictAnchor {
        lat,
        lon,
        name: String::new(),
        anchor_type: AnchorType::Fallback,
        school: None,
    }
}

/// Degrees of latitude spanning `miles` along a meridian.
pub fn lat_degrees(miles: f64) -> f64 {
    (miles / district_map_spatial::EARTH_RADIUS_MILES).to_degrees()
}
