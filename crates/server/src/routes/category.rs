use crate::{
    dtos::response::ApiResponse,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use database::{
    entities::grade_category,
    services::category::{CategoryInput, CategoryService},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grades/categories", get(list_categories).post(create_category))
        .route(
            "/grades/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<grade_category::Model>>, ApiError> {
    Ok(ApiResponse::success(CategoryService::list(&state.db).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<grade_category::Model>, ApiError> {
    Ok(ApiResponse::success(
        CategoryService::get(&state.db, id).await?,
    ))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = CategoryService::create(&state.db, input).await?;

    Ok((StatusCode::CREATED, ApiResponse::success(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<ApiResponse<grade_category::Model>, ApiError> {
    Ok(ApiResponse::success(
        CategoryService::update(&state.db, id, input).await?,
    ))
}

pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    CategoryService::delete(&state.db, id).await?;

    Ok(ApiResponse::message("category deleted"))
}
