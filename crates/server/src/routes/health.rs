use crate::{dtos::response::ApiResponse, state::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use log::warn;

/// Reports whether the service and its database are reachable
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, ApiResponse::message("OK")),
        Err(err) => {
            warn!("Health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiResponse::error("database unavailable"),
            )
        }
    }
}
