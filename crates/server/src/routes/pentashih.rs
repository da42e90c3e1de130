use crate::{
    dtos::{
        pentashih::{MenteeIds, NewPentashih},
        response::ApiResponse,
    },
    error::ApiError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};
use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use database::services::pentashih::{Mentee, MentorDetail, PentashihService};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grades/pentashih", get(list_pentashih).post(create_pentashih))
        .route(
            "/grades/pentashih/{id}",
            get(get_pentashih)
                .put(replace_mentees)
                .delete(delete_pentashih),
        )
        .route("/grades/pentashih/{id}/santri", get(list_mentees))
}

pub async fn list_pentashih(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<MentorDetail>>, ApiError> {
    Ok(ApiResponse::success(PentashihService::list(&state.db).await?))
}

pub async fn get_pentashih(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<MentorDetail>, ApiError> {
    Ok(ApiResponse::success(
        PentashihService::get(&state.db, id).await?,
    ))
}

pub async fn list_mentees(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<Vec<Mentee>>, ApiError> {
    Ok(ApiResponse::success(
        PentashihService::mentees(&state.db, id).await?,
    ))
}

pub async fn create_pentashih(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewPentashih>,
) -> Result<impl IntoResponse, ApiError> {
    let created = PentashihService::create(&state.db, new.pentashih_id, &new.santri_ids).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(created).with_message("pentashih created"),
    ))
}

/// Replaces the set of santri assigned to a pentashih
pub async fn replace_mentees(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(ids): ApiJson<MenteeIds>,
) -> Result<ApiResponse<MentorDetail>, ApiError> {
    let updated = PentashihService::replace_mentees(&state.db, id, &ids.into_vec()).await?;

    Ok(ApiResponse::success(updated).with_message("pentashih updated"))
}

pub async fn delete_pentashih(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    PentashihService::delete(&state.db, id).await?;

    Ok(ApiResponse::message("pentashih deleted"))
}
