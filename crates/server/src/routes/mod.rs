pub mod category;
pub mod grade;
pub mod health;
pub mod pentashih;
pub mod santri;
pub mod statistic;
pub mod subject;

use crate::{error::ApiError, state::AppState};
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

/// Builds the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(santri::router())
        .merge(grade::router())
        .merge(category::router())
        .merge(subject::router())
        .merge(pentashih::router())
        .merge(statistic::router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}


#[cfg(test)]
mod tests {
    use super::test_util::TestApp;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_unknown_route_is_enveloped() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/nowhere").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "route not found");
    }
}
