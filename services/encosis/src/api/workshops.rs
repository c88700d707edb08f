//! Workshop (`/oficinas`) API handlers.
//!
//! # Purpose
//! Workshop catalog endpoints plus the per-workshop enrollment listing. The
//! enroll endpoint itself lives in [`crate::api::enrollments`].
use crate::api::error::{ApiError, service_error};
use crate::api::extract::ApiJson;
use crate::api::types::DeletedWithEnrollmentsResponse;
use crate::app::AppState;
use crate::model::{Enrollment, Workshop, WorkshopCreateRequest, WorkshopSummary};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/oficinas",
    tag = "oficinas",
    responses(
        (status = 200, description = "Workshops ordered by title", body = [WorkshopSummary])
    )
)]
pub(crate) async fn list_workshops(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkshopSummary>>, ApiError> {
    let items = state
        .catalog
        .list_workshops()
        .await
        .map_err(|err| service_error("failed to list workshops", err))?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/oficinas/cadastro",
    tag = "oficinas",
    request_body = WorkshopCreateRequest,
    responses(
        (status = 201, description = "Workshop created with every seat available", body = Workshop),
        (status = 400, description = "Invalid workshop", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Professor not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_workshop(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<WorkshopCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let workshop = state
        .catalog
        .create_workshop(body)
        .await
        .map_err(|err| service_error("failed to create workshop", err))?;
    Ok((StatusCode::CREATED, Json(workshop)))
}

#[utoipa::path(
    get,
    path = "/oficinas/{id}",
    tag = "oficinas",
    params(("id" = u64, Path, description = "Workshop id")),
    responses(
        (status = 200, description = "Fetch workshop", body = Workshop),
        (status = 404, description = "Workshop not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_workshop(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Workshop>, ApiError> {
    state
        .catalog
        .get_workshop(id)
        .await
        .map(Json)
        .map_err(|err| service_error("failed to fetch workshop", err))
}

#[utoipa::path(
    delete,
    path = "/oficinas/{id}",
    tag = "oficinas",
    params(("id" = u64, Path, description = "Workshop id")),
    responses(
        (status = 200, description = "Workshop removed", body = DeletedWithEnrollmentsResponse),
        (status = 404, description = "Workshop not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Workshop has enrollments and deletes are rejected", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_workshop(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<DeletedWithEnrollmentsResponse>, ApiError> {
    let removed = state
        .catalog
        .delete_workshop(id)
        .await
        .map_err(|err| service_error("failed to delete workshop", err))?;
    Ok(Json(DeletedWithEnrollmentsResponse {
        message: "workshop deleted".to_string(),
        inscricoes_removidas: removed,
    }))
}

#[utoipa::path(
    get,
    path = "/oficinas/{id}/inscricoes",
    tag = "oficinas",
    params(("id" = u64, Path, description = "Workshop id")),
    responses(
        (status = 200, description = "Enrollments in this workshop", body = [Enrollment]),
        (status = 404, description = "Workshop not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_workshop_enrollments(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    state
        .catalog
        .list_workshop_enrollments(id)
        .await
        .map(Json)
        .map_err(|err| service_error("failed to list enrollments", err))
}
