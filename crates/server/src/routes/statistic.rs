use crate::{dtos::response::ApiResponse, error::ApiError, state::AppState};
use axum::{Router, extract::State, routing::get};
use database::services::statistic::{DashboardStats, StatisticService};

pub fn router() -> Router<AppState> {
    Router::new().route("/statistics/dashboard", get(dashboard))
}

pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<ApiResponse<DashboardStats>, ApiError> {
    Ok(ApiResponse::success(
        StatisticService::dashboard(&state.db).await?,
    ))
}
