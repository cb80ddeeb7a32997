//! Informational endpoints: root and health check

use crate::{api::routes::ENDPOINTS, state::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    let endpoints: Vec<_> = ENDPOINTS
        .iter()
        .map(|(label, method, path)| json!({ "name": label, "method": method, "path": path }))
        .collect();

    Json(json!({
        "server": "patient-manager",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": endpoints,
    }))
}

/// `GET /health` - 503 when the store does not answer a ping.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.patients.store();
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "patient-manager",
                "store": store.backend(),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "patient-manager",
                    "store": store.backend(),
                })),
            )
        }
    }
}
