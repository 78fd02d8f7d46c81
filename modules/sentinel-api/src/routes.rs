use axum::{
    http::{header, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::rest;
use crate::AppState;

/// Wire every dashboard route. An empty `allowed_origins` allows any origin.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = parse_origins(allowed_origins);
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", get(rest::api_root))
        .route("/health", get(rest::health))
        .route(
            "/wards",
            get(rest::wards::api_wards).post(rest::wards::api_create_ward),
        )
        .route(
            "/signals/{ward_id}",
            get(rest::signals::api_ward_signals).post(rest::signals::api_submit_signals),
        )
        .route(
            "/disease-data/{ward_id}",
            get(rest::diseases::api_ward_diseases).post(rest::diseases::api_report_disease),
        )
        .route("/all-alerts", get(rest::analytics::api_all_alerts))
        .route("/analytics/overview", get(rest::analytics::api_analytics_overview))
        .route(
            "/simulate-policy",
            post(rest::policy::api_simulate_policy),
        )
        .route("/simulation-history", get(rest::policy::api_simulation_history))
        .route("/ai-alerts/{ward_id}", get(rest::ai::api_ai_alert))
        .route("/users", post(rest::users::api_login))
        .route("/users/{user_id}", get(rest::users::api_user))
        .route(
            "/users/{user_id}/data",
            get(rest::users::api_user_data).post(rest::users::api_save_user_data),
        )
        .with_state(state)
        .layer(cors)
        // Live readings, never cached.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

/// Origins that are not valid header values are skipped with a warning.
fn parse_origins(allowed_origins: &[String]) -> Vec<HeaderValue> {
    allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}
