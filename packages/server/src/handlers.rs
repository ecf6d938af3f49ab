//! HTTP handler functions for the district map API.

use actix_web::{HttpResponse, web};
use district_map_consolidation::{compute_consolidation, select_districts};
use district_map_dataset::DistrictDataset;
use district_map_district_models::DistrictKey;
use district_map_server_models::{
    ApiDistrictDetail, ApiDistrictSummary, ApiHealth, ApiKeyLookup, ConsolidationRequest,
    KeyQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        complete_districts: state.dataset.stats().complete,
    })
}

/// `GET /api/stats`
///
/// Record counts and coverage gaps across the three datasets.
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dataset.stats())
}

/// `GET /api/districts`
///
/// Lists every district known to any dataset, sorted by key.
pub async fn districts(state: web::Data<AppState>) -> HttpResponse {
    let dataset = state.dataset.as_ref();
    let summaries: Vec<ApiDistrictSummary> = dataset
        .district_keys()
        .into_iter()
        .map(|key| summarize(dataset, key))
        .collect();

    HttpResponse::Ok().json(summaries)
}

/// `GET /api/districts/{key}`
///
/// Accepts a key or a free-text name. Responds 404 when no dataset has a
/// record for it.
pub async fn district(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let key = state.normalizer.district_key(&path);
    let dataset = state.dataset.as_ref();

    let budget = dataset.budgets.get(&key).cloned();
    let enrollment = dataset.enrollments.get(&key).cloned();
    let anchor = dataset.anchors.get(&key).cloned();

    if budget.is_none() && enrollment.is_none() && anchor.is_none() {
        log::debug!("No district records for '{}' (key '{key}')", path.as_str());
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Unknown district: {}", path.as_str())
        }));
    }

    HttpResponse::Ok().json(ApiDistrictDetail {
        name: display_name(dataset, &key),
        key,
        budget,
        enrollment,
        anchor,
    })
}

/// `GET /api/keys?name=...&school=...`
///
/// Returns the district key (and optionally the school key) for a name.
pub async fn key_lookup(
    state: web::Data<AppState>,
    params: web::Query<KeyQueryParams>,
) -> HttpResponse {
    let params = params.into_inner();
    let key = state.normalizer.district_key(&params.name);
    let school_key = params
        .school
        .as_deref()
        .map(|school| state.normalizer.school_key(&params.name, school));
    let charter_school = params
        .school
        .as_deref()
        .map(|school| state.normalizer.is_charter_school(school));
    let known = state.dataset.budgets.contains_key(&key)
        || state.dataset.enrollments.contains_key(&key)
        || state.dataset.anchors.contains_key(&key);

    HttpResponse::Ok().json(ApiKeyLookup {
        name: params.name,
        key,
        school_key,
        charter_school,
        known,
    })
}

/// `POST /api/consolidation`
///
/// Runs a consolidation estimate. Incomplete selections are not errors:
/// they come back as `ok: false` with the missing keys.
pub async fn consolidation(
    state: web::Data<AppState>,
    body: web::Json<ConsolidationRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let selected = select_districts(&state.normalizer, &request.districts);
    let dataset = state.dataset.as_ref();

    let result = compute_consolidation(
        &selected,
        &dataset.budgets,
        &dataset.enrollments,
        &dataset.anchors,
        &request.params(),
    );

    log::info!(
        "Consolidation of {} district(s): ok={} warnings={}",
        selected.len(),
        result.is_ok(),
        result.warnings().len()
    );

    HttpResponse::Ok().json(result)
}

fn summarize(dataset: &DistrictDataset, key: &DistrictKey) -> ApiDistrictSummary {
    let enrollment = dataset.enrollments.get(key).map(|e| e.total);
    ApiDistrictSummary {
        key: key.clone(),
        name: display_name(dataset, key),
        enrollment,
        has_budget: dataset.budgets.contains_key(key),
        has_enrollment: enrollment.is_some(),
        has_anchor: dataset.anchors.contains_key(key),
    }
}

fn display_name(dataset: &DistrictDataset, key: &DistrictKey) -> String {
    dataset
        .display_name(key.as_str())
        .unwrap_or(key.as_str())
        .to_string()
}
