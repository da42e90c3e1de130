use crate::{
    dtos::response::ApiResponse,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use database::services::subject::{SubjectDetail, SubjectInput, SubjectService};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grades/subjects", get(list_subjects).post(create_subject))
        .route(
            "/grades/subjects/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route(
            "/grades/subjects/category/{category_id}",
            get(list_subjects_by_category),
        )
}

pub async fn list_subjects(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<SubjectDetail>>, ApiError> {
    Ok(ApiResponse::success(SubjectService::list(&state.db).await?))
}

pub async fn list_subjects_by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i32>,
) -> Result<ApiResponse<Vec<SubjectDetail>>, ApiError> {
    Ok(ApiResponse::success(
        SubjectService::list_by_category(&state.db, category_id).await?,
    ))
}

pub async fn get_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<SubjectDetail>, ApiError> {
    Ok(ApiResponse::success(SubjectService::get(&state.db, id).await?))
}

pub async fn create_subject(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    let subject = SubjectService::create(&state.db, input).await?;

    Ok((StatusCode::CREATED, ApiResponse::success(subject)))
}

pub async fn update_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<SubjectInput>,
) -> Result<ApiResponse<SubjectDetail>, ApiError> {
    Ok(ApiResponse::success(
        SubjectService::update(&state.db, id, input).await?,
    ))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    SubjectService::delete(&state.db, id).await?;

    Ok(ApiResponse::message("subject deleted"))
}
