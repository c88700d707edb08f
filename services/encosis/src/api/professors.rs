//! Professor (`/professores`) API handlers.
use crate::api::error::{ApiError, service_error};
use crate::api::extract::ApiJson;
use crate::api::types::MessageResponse;
use crate::app::AppState;
use crate::model::{Professor, ProfessorCreateRequest};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/professores",
    tag = "professores",
    responses(
        (status = 200, description = "List professors", body = [Professor])
    )
)]
pub(crate) async fn list_professors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Professor>>, ApiError> {
    let items = state
        .catalog
        .list_professors()
        .await
        .map_err(|err| service_error("failed to list professors", err))?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/professores/cadastro",
    tag = "professores",
    request_body = ProfessorCreateRequest,
    responses(
        (status = 201, description = "Professor registered", body = Professor),
        (status = 400, description = "Missing required fields", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_professor(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProfessorCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let professor = state
        .catalog
        .create_professor(body)
        .await
        .map_err(|err| service_error("failed to register professor", err))?;
    Ok((StatusCode::CREATED, Json(professor)))
}

#[utoipa::path(
    get,
    path = "/professores/{id}",
    tag = "professores",
    params(("id" = u64, Path, description = "Professor id")),
    responses(
        (status = 200, description = "Fetch professor", body = Professor),
        (status = 404, description = "Professor not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_professor(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Professor>, ApiError> {
    state
        .catalog
        .get_professor(id)
        .await
        .map(Json)
        .map_err(|err| service_error("failed to fetch professor", err))
}

#[utoipa::path(
    delete,
    path = "/professores/{id}",
    tag = "professores",
    params(("id" = u64, Path, description = "Professor id")),
    responses(
        (status = 200, description = "Professor removed", body = MessageResponse),
        (status = 404, description = "Professor not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Professor still teaches a workshop or lecture", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_professor(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .catalog
        .delete_professor(id)
        .await
        .map_err(|err| service_error("failed to delete professor", err))?;
    Ok(Json(MessageResponse {
        message: "professor deleted".to_string(),
    }))
}
