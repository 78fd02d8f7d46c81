use axum::{extract::State, response::Json};
use serde::Serialize;

use sentinel_common::{Alert, AnalyticsSnapshot, DiseaseData};
use sentinel_engine::{compute_city_analytics, generate_alert};

use crate::error::ApiResult;
use crate::AppState;

/// One map marker: where the ward is and how worried to be about it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardAlert {
    pub ward_id: String,
    pub ward_name: String,
    pub lat: f64,
    pub lng: f64,
    pub alert: Alert,
    pub disease_data: DiseaseData,
}

pub async fn api_all_alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<WardAlert>>> {
    let wards = state.store.list_wards().await?;
    let mut signals = state.store.all_signals().await?;
    let mut diseases = state.store.all_disease_data().await?;

    let alerts = wards
        .into_iter()
        .map(|ward| {
            let ward_signals = signals.remove(&ward.id).unwrap_or_default();
            let disease_data = diseases.remove(&ward.id).unwrap_or_default();
            WardAlert {
                alert: generate_alert(&ward_signals, &disease_data),
                ward_id: ward.id,
                ward_name: ward.name,
                lat: ward.lat,
                lng: ward.lng,
                disease_data,
            }
        })
        .collect();

    Ok(Json(alerts))
}

pub async fn api_analytics_overview(
    State(state): State<AppState>,
) -> ApiResult<Json<AnalyticsSnapshot>> {
    let wards = state.store.list_wards().await?;
    let signals = state.store.all_signals().await?;
    Ok(Json(compute_city_analytics(&wards, &signals)))
}
