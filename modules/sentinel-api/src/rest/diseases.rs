use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use sentinel_common::{lenient_number, Alert, DiseaseData, DiseaseEntry};

use super::require_ward;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    disease: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    clinic_visits: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pharmacy_sales: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseUpdateResponse {
    pub ward_id: String,
    pub disease: String,
    pub data: DiseaseEntry,
    pub alert: Alert,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardDiseasesResponse {
    pub ward_id: String,
    pub diseases: DiseaseData,
}

pub async fn api_report_disease(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
    body: Result<Json<DiseaseReport>, JsonRejection>,
) -> ApiResult<Json<DiseaseUpdateResponse>> {
    let Json(report) = body?;
    let disease = report
        .disease
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("disease is required"))?;
    require_ward(&state, &ward_id).await?;

    let entry = DiseaseEntry {
        clinic_visits: report.clinic_visits,
        pharmacy_sales: report.pharmacy_sales,
        updated_at: Some(Utc::now()),
    };
    let (disease, committed) = state
        .store
        .upsert_disease_entry(&ward_id, &disease, entry.clone())
        .await?;
    let alert = committed.alert;

    info!(
        ward_id = %ward_id,
        disease = %disease,
        clinic_visits = entry.clinic_visits,
        pharmacy_sales = entry.pharmacy_sales,
        level = %alert.level,
        "Disease counters updated"
    );

    Ok(Json(DiseaseUpdateResponse {
        ward_id,
        disease,
        data: entry,
        alert,
    }))
}

/// Unknown wards read as having no reports.
pub async fn api_ward_diseases(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<WardDiseasesResponse>> {
    let diseases = state.store.disease_data(&ward_id).await?;
    Ok(Json(WardDiseasesResponse { ward_id, diseases }))
}
