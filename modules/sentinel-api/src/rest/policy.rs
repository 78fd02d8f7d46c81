use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use sentinel_common::{parse_number, PolicyOutcome};
use sentinel_engine::{simulate_policy, PolicyError};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Deserialize)]
pub struct SimulateRequest {
    cases: Option<Value>,
    policy: Option<String>,
}

impl SimulateRequest {
    /// `cases` may be a number or a numeric string; anything else is invalid.
    fn cases(&self) -> Result<f64, PolicyError> {
        self.cases
            .as_ref()
            .and_then(parse_number)
            .ok_or(PolicyError::InvalidCases)
    }

    fn policy(&self) -> Option<&str> {
        self.policy.as_deref().filter(|p| !p.is_empty())
    }
}

pub async fn api_simulate_policy(
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> ApiResult<Json<PolicyOutcome>> {
    let Json(request) = body?;
    let outcome = simulate_policy(request.cases()?, request.policy())?;
    info!(
        policy = %outcome.policy,
        original_cases = outcome.original_cases,
        reduced_cases = outcome.reduced_cases,
        "Policy simulated"
    );
    Ok(Json(outcome))
}

pub async fn api_simulation_history(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.store.simulation_history().await?))
}
