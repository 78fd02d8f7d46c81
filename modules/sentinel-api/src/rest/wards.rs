use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use sentinel_common::{parse_number, Ward};
use sentinel_store::NewWard;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const WARD_FIELDS_REQUIRED: &str = "name, lat and lng are required";

#[derive(Deserialize)]
pub struct CreateWardRequest {
    name: Option<String>,
    lat: Option<Value>,
    lng: Option<Value>,
}

impl CreateWardRequest {
    fn validate(self) -> ApiResult<NewWard> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::bad_request(WARD_FIELDS_REQUIRED))?;
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Err(ApiError::bad_request(WARD_FIELDS_REQUIRED));
        };
        let lat = parse_number(&lat).ok_or_else(|| ApiError::bad_request("lat must be a number"))?;
        let lng = parse_number(&lng).ok_or_else(|| ApiError::bad_request("lng must be a number"))?;
        Ok(NewWard { name, lat, lng })
    }
}

pub async fn api_wards(State(state): State<AppState>) -> ApiResult<Json<Vec<Ward>>> {
    Ok(Json(state.store.list_wards().await?))
}

pub async fn api_create_ward(
    State(state): State<AppState>,
    body: Result<Json<CreateWardRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Ward>)> {
    let Json(body) = body?;
    let ward = state.store.insert_ward(body.validate()?).await?;
    info!(ward_id = %ward.id, name = %ward.name, "Ward created");
    Ok((StatusCode::CREATED, Json(ward)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> CreateWardRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numeric_strings_are_accepted_for_coordinates() {
        let ward = request(json!({ "name": " Riverside ", "lat": "12.9", "lng": 77.6 }))
            .validate()
            .unwrap();
        assert_eq!(ward.name, "Riverside");
        assert_eq!(ward.lat, 12.9);
    }

    #[test]
    fn missing_fields_are_rejected() {
        for body in [
            json!({ "lat": 1, "lng": 2 }),
            json!({ "name": "", "lat": 1, "lng": 2 }),
            json!({ "name": "A", "lng": 2 }),
            json!({ "name": "A", "lat": 1 }),
        ] {
            let err = request(body).validate().unwrap_err();
            assert_eq!(err.to_string(), WARD_FIELDS_REQUIRED);
        }
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let err = request(json!({ "name": "A", "lat": "north", "lng": 2 }))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
