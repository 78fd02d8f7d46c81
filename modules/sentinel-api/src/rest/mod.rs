pub mod ai;
pub mod analytics;
pub mod diseases;
pub mod policy;
pub mod signals;
pub mod users;
pub mod wards;

use axum::response::Json;
use serde_json::{json, Value};

use sentinel_common::Ward;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

// --- Helpers ---

/// Resolve a ward or fail with the 404 every ward-scoped route shares.
pub(crate) async fn require_ward(state: &AppState, ward_id: &str) -> ApiResult<Ward> {
    state
        .store
        .get_ward(ward_id)
        .await?
        .ok_or_else(ApiError::ward_not_found)
}

// --- Service routes ---

pub async fn api_root() -> Json<Value> {
    Json(json!({ "status": "Sentinel City backend running" }))
}

pub async fn health() -> &'static str {
    "ok"
}
