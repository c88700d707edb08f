//! Lecture (`/palestras`) API handlers.
use crate::api::error::{ApiError, service_error};
use crate::api::extract::ApiJson;
use crate::api::types::DeletedWithEnrollmentsResponse;
use crate::app::AppState;
use crate::model::{Lecture, LectureCreateRequest};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/palestras",
    tag = "palestras",
    responses(
        (status = 200, description = "Lectures ordered by start time", body = [Lecture])
    )
)]
pub(crate) async fn list_lectures(
    State(state): State<AppState>,
) -> Result<Json<Vec<Lecture>>, ApiError> {
    let items = state
        .catalog
        .list_lectures()
        .await
        .map_err(|err| service_error("failed to list lectures", err))?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/palestras/cadastro",
    tag = "palestras",
    request_body = LectureCreateRequest,
    responses(
        (status = 201, description = "Lecture created", body = Lecture),
        (status = 400, description = "Invalid lecture", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Professor not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_lecture(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LectureCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lecture = state
        .catalog
        .create_lecture(body)
        .await
        .map_err(|err| service_error("failed to create lecture", err))?;
    Ok((StatusCode::CREATED, Json(lecture)))
}

#[utoipa::path(
    get,
    path = "/palestras/{id}",
    tag = "palestras",
    params(("id" = u64, Path, description = "Lecture id")),
    responses(
        (status = 200, description = "Fetch lecture", body = Lecture),
        (status = 404, description = "Lecture not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_lecture(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Lecture>, ApiError> {
    state
        .catalog
        .get_lecture(id)
        .await
        .map(Json)
        .map_err(|err| service_error("failed to fetch lecture", err))
}

#[utoipa::path(
    delete,
    path = "/palestras/{id}",
    tag = "palestras",
    params(("id" = u64, Path, description = "Lecture id")),
    responses(
        (status = 200, description = "Lecture removed", body = DeletedWithEnrollmentsResponse),
        (status = 404, description = "Lecture not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Lecture has enrollments and deletes are rejected", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_lecture(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<DeletedWithEnrollmentsResponse>, ApiError> {
    let removed = state
        .catalog
        .delete_lecture(id)
        .await
        .map_err(|err| service_error("failed to delete lecture", err))?;
    Ok(Json(DeletedWithEnrollmentsResponse {
        message: "lecture deleted".to_string(),
        inscricoes_removidas: removed,
    }))
}
