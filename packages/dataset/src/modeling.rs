//! Derives the modeled central-administration figures for a budget.
//!
//! Source budgets sometimes carry negative adjustment lines or an admin
//! share far outside what districts actually spend. Projections use the
//! modeled figure, which clamps the former and caps the latter, while the
//! raw figure is kept alongside for display.

use district_map_district_models::DistrictBudget;

/// Flags attached to a modeled budget.
pub mod flags {
    /// A raw admin component was negative and was clamped to zero.
    pub const NEGATIVE_ADMIN_COMPONENT_CLAMPED: &str = "negative_admin_component_clamped";
    /// The modeled admin share exceeded the cap and was capped.
    pub const ADMIN_SHARE_OUTLIER: &str = "admin_share_outlier";
    /// Total expenditures were zero or missing, so no shares are computed.
    pub const MISSING_TOTAL_EXPENDITURES: &str = "missing_total_expenditures";
}

/// Tunables for [`model_budget`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdminModelPolicy {
    /// Largest admin share of total expenditures treated as plausible.
    pub outlier_share_cap: f64,
}

impl Default for AdminModelPolicy {
    fn default() -> Self {
        Self {
            outlier_share_cap: 0.15,
        }
    }
}

/// Raw budget figures as extracted from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetSource {
    /// District name as printed in the source.
    pub display_name: String,
    /// Fiscal year label.
    pub fiscal_year: String,
    /// Total expenditures in dollars.
    pub total_expenditures: f64,
    /// District-management spend.
    pub district_management: f64,
    /// Program/operations-management spend.
    pub program_operations_management: f64,
}

/// Builds a [`DistrictBudget`] with raw and modeled admin figures.
#[must_use]
pub fn model_budget(source: BudgetSource, policy: &AdminModelPolicy) -> DistrictBudget {
    let mut budget_flags = Vec::new();

    let raw = source.district_management + source.program_operations_management;

    if source.district_management < 0.0 || source.program_operations_management < 0.0 {
        budget_flags.push(flags::NEGATIVE_ADMIN_COMPONENT_CLAMPED.to_string());
    }
    let mut model =
        source.district_management.max(0.0) + source.program_operations_management.max(0.0);

    let total = source.total_expenditures;
    let (admin_share_raw, admin_share_model) = if total > 0.0 {
        let cap = policy.outlier_share_cap.max(0.0);
        if model / total > cap {
            log::debug!(
                "{}: admin share {:.3} exceeds cap {cap:.3}",
                source.display_name,
                model / total
            );
            model = cap * total;
            budget_flags.push(flags::ADMIN_SHARE_OUTLIER.to_string());
        }
        (Some(raw / total), Some(model / total))
    } else {
        budget_flags.push(flags::MISSING_TOTAL_EXPENDITURES.to_string());
        (None, None)
    };

    DistrictBudget {
        display_name: source.display_name,
        fiscal_year: source.fiscal_year,
        total_expenditures: total.max(0.0),
        district_management: source.district_management,
        program_operations_management: source.program_operations_management,
        central_administration_raw: raw,
        central_administration_model: model,
        admin_share_raw,
        admin_share_model,
        flags: budget_flags,
    }
}
