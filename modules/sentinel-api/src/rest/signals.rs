use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use sentinel_common::{lenient_number, Alert, DiseaseData, SignalSet};
use sentinel_engine::generate_alert;
use sentinel_store::WardState;

use super::require_ward;
use crate::error::ApiResult;
use crate::AppState;

/// Readings as an administrator submits them. Any client `updatedAt` is ignored;
/// the server stamps the submission time.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSubmission {
    #[serde(default, deserialize_with = "lenient_number")]
    clinic_visits: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pharmacy_sales: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pollution: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    temperature: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    mobility: f64,
}

impl SignalSubmission {
    fn into_signals(self) -> SignalSet {
        SignalSet {
            clinic_visits: self.clinic_visits,
            pharmacy_sales: self.pharmacy_sales,
            pollution: self.pollution,
            temperature: self.temperature,
            mobility: self.mobility,
            updated_at: Some(Utc::now()),
        }
    }
}

/// A ward's current readings together with the alert derived from them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalsResponse {
    pub ward_id: String,
    pub signals: SignalSet,
    pub alert: Alert,
    pub disease_data: DiseaseData,
}

impl SignalsResponse {
    fn new(ward_id: String, signals: SignalSet, disease_data: DiseaseData) -> Self {
        let alert = generate_alert(&signals, &disease_data);
        Self {
            ward_id,
            signals,
            alert,
            disease_data,
        }
    }

    fn committed(ward_id: String, state: WardState) -> Self {
        Self {
            ward_id,
            signals: state.signals,
            alert: state.alert,
            disease_data: state.disease_data,
        }
    }
}

pub async fn api_submit_signals(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
    body: Result<Json<SignalSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignalsResponse>)> {
    require_ward(&state, &ward_id).await?;
    let Json(submission) = body?;

    let committed = state
        .store
        .put_signals(&ward_id, submission.into_signals())
        .await?;

    let response = SignalsResponse::committed(ward_id, committed);
    info!(
        ward_id = %response.ward_id,
        level = %response.alert.level,
        "Signals updated"
    );
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn api_ward_signals(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<SignalsResponse>> {
    require_ward(&state, &ward_id).await?;
    let signals = state.store.get_signals(&ward_id).await?.unwrap_or_default();
    let disease_data = state.store.disease_data(&ward_id).await?;
    Ok(Json(SignalsResponse::new(ward_id, signals, disease_data)))
}
