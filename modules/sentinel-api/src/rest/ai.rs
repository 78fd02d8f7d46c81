use axum::{
    extract::{Path, State},
    response::Json,
};

use super::require_ward;
use crate::error::ApiResult;
use crate::narrative::Narrative;
use crate::AppState;

/// Always 200 for a known ward; model failures come back as the fallback narrative.
pub async fn api_ai_alert(
    State(state): State<AppState>,
    Path(ward_id): Path<String>,
) -> ApiResult<Json<Narrative>> {
    let ward = require_ward(&state, &ward_id).await?;
    let signals = state.store.get_signals(&ward_id).await?.unwrap_or_default();
    let disease_data = state.store.disease_data(&ward_id).await?;

    let narrative = state
        .narrator
        .predict(&ward.name, &signals, &disease_data)
        .await;
    Ok(Json(narrative))
}
