use crate::{
    dtos::response::ApiResponse,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use database::services::grade::{
    GradeChanges, GradeDetail, GradeFilter, GradeReport, GradeService, NewGrade,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grades", get(list_grades).post(create_grade))
        .route(
            "/grades/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route("/grades/santri/{code}", get(get_report))
}

pub async fn list_grades(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<GradeFilter>,
) -> Result<ApiResponse<Vec<GradeDetail>>, ApiError> {
    Ok(ApiResponse::success(
        GradeService::list(&state.db, &filter).await?,
    ))
}

pub async fn get_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<GradeDetail>, ApiError> {
    Ok(ApiResponse::success(GradeService::get(&state.db, id).await?))
}

/// Records a grade; a second grade for the same santri and subject updates
/// the first
pub async fn create_grade(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewGrade>,
) -> Result<impl IntoResponse, ApiError> {
    let grade = GradeService::create(&state.db, new).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(grade).with_message("grade saved"),
    ))
}

pub async fn update_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(changes): ApiJson<GradeChanges>,
) -> Result<ApiResponse<GradeDetail>, ApiError> {
    let grade = GradeService::update(&state.db, id, changes).await?;

    Ok(ApiResponse::success(grade).with_message("grade updated"))
}

pub async fn delete_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    GradeService::delete(&state.db, id).await?;

    Ok(ApiResponse::message("grade deleted"))
}

/// Progress report for the santri with the given code
pub async fn get_report(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<ApiResponse<GradeReport>, ApiError> {
    Ok(ApiResponse::success(
        GradeService::report_by_code(&state.db, &code).await?,
    ))
}
