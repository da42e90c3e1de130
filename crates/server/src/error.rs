use crate::dtos::response::ApiResponse;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use thiserror::Error;

/// Error returned by handlers, rendered as an error envelope
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    BadRequest(String),

    #[error("route not found")]
    RouteNotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::NotFound(_)) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Service(ServiceError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Database details stay in the log
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, ApiResponse::error(message)).into_response()
    }
}
