use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use sentinel_common::{parse_number, User, UserData, UserRole};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    role: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
pub struct UserDataRequest {
    location: Option<Value>,
    pollution: Option<Value>,
    temperature: Option<Value>,
    diseases: Option<Value>,
}

impl UserDataRequest {
    fn into_user_data(self) -> UserData {
        UserData {
            location: self.location.filter(is_truthy),
            pollution: self.pollution.as_ref().and_then(parse_number),
            temperature: self.temperature.as_ref().and_then(parse_number),
            diseases: match self.diseases {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            updated_at: Some(Utc::now()),
        }
    }
}

/// Dashboard forms send `""`, `0` or `false` for "no location".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Find the user with this role and name, or register a new one.
pub async fn api_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(request) = body?;
    let role: UserRole = request
        .role
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::bad_request("role must be citizen, pharmacist or hospital"))?;
    let name = request.name.filter(|n| !n.trim().is_empty());

    let user = state.store.login_user(role, name).await?;
    info!(user_id = %user.id, role = %user.role, "User signed in");
    Ok(Json(user))
}

pub async fn api_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<User>> {
    state
        .store
        .get_user(&user_id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::user_not_found)
}

pub async fn api_user_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserData>> {
    Ok(Json(state.store.user_data(&user_id).await?.unwrap_or_default()))
}

pub async fn api_save_user_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<UserDataRequest>, JsonRejection>,
) -> ApiResult<Json<UserData>> {
    let Json(request) = body?;
    let saved = state
        .store
        .put_user_data(&user_id, request.into_user_data())
        .await?;
    info!(user_id = %user_id, "User data saved");
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_locations_are_dropped() {
        for location in [json!(""), json!(0), json!(false), json!(null)] {
            let request: UserDataRequest =
                serde_json::from_value(json!({ "location": location })).unwrap();
            assert_eq!(request.into_user_data().location, None);
        }
    }

    #[test]
    fn readings_are_coerced() {
        let request: UserDataRequest = serde_json::from_value(json!({
            "location": { "lat": 12.9, "lng": 77.6 },
            "pollution": "64",
            "temperature": "warm",
            "diseases": "flu",
        }))
        .unwrap();
        let data = request.into_user_data();
        assert_eq!(data.location, Some(json!({ "lat": 12.9, "lng": 77.6 })));
        assert_eq!(data.pollution, Some(64.0));
        assert_eq!(data.temperature, None);
        assert!(data.diseases.is_empty());
        assert!(data.updated_at.is_some());
    }
}
