use crate::{
    dtos::{
        response::{ApiResponse, PaginationMeta},
        santri::{PaginatedSantriResponse, RoleUpdate, SantriQueryParams, SearchParams},
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use database::{
    entities::santri,
    services::santri::{NewSantri, SantriFilter, SantriPatch, SantriService},
};
use models::Status;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/santri", get(list_santri).post(create_santri))
        .route("/santri/search", get(search_santri))
        .route("/santri/role", put(update_role))
        .route("/santri/code/{code}", get(get_santri_by_code))
        .route(
            "/santri/{id}",
            get(get_santri).put(update_santri).delete(delete_santri),
        )
}

/// Get paginated list of santri
pub async fn list_santri(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SantriQueryParams>,
) -> Result<ApiResponse<PaginatedSantriResponse>, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(|value| {
            Status::from_filter(value)
                .ok_or_else(|| ApiError::BadRequest(format!("invalid status filter `{value}`")))
        })
        .transpose()?;

    let filter = SantriFilter {
        gender: params.gender,
        status,
        role: params.role,
        assigned: params.assigned,
    };

    let (santri, total_items) =
        SantriService::list(&state.db, &filter, params.page, params.per_page).await?;

    Ok(ApiResponse::success(PaginatedSantriResponse {
        santri,
        pagination: PaginationMeta::new(params.page, params.per_page, total_items),
    }))
}

pub async fn get_santri(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<santri::Model>, ApiError> {
    Ok(ApiResponse::success(SantriService::get(&state.db, id).await?))
}

pub async fn get_santri_by_code(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<ApiResponse<santri::Model>, ApiError> {
    Ok(ApiResponse::success(
        SantriService::get_by_code(&state.db, &code).await?,
    ))
}

pub async fn search_santri(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<ApiResponse<Vec<santri::Model>>, ApiError> {
    Ok(ApiResponse::success(
        SantriService::search(&state.db, &params.query).await?,
    ))
}

pub async fn create_santri(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewSantri>,
) -> Result<impl IntoResponse, ApiError> {
    let created = SantriService::create(&state.db, new).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(created).with_message("santri created"),
    ))
}

pub async fn update_santri(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<SantriPatch>,
) -> Result<ApiResponse<santri::Model>, ApiError> {
    let updated = SantriService::update(&state.db, id, patch).await?;

    Ok(ApiResponse::success(updated).with_message("santri updated"))
}

pub async fn update_role(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<RoleUpdate>,
) -> Result<ApiResponse<santri::Model>, ApiError> {
    let updated = SantriService::update_role(&state.db, update.id, update.role).await?;

    Ok(ApiResponse::success(updated).with_message("role updated"))
}

pub async fn delete_santri(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    SantriService::delete(&state.db, id).await?;

    Ok(ApiResponse::message("santri deleted"))
}
