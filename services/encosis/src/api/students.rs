//! Student (`/alunos`) API handlers.
use crate::api::error::{ApiError, service_error};
use crate::api::extract::ApiJson;
use crate::api::types::MessageResponse;
use crate::app::AppState;
use crate::model::{Student, StudentCreateRequest, StudentWithWorkshops};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/alunos",
    tag = "alunos",
    responses(
        (status = 200, description = "Students with the titles of their workshops", body = [StudentWithWorkshops])
    )
)]
pub(crate) async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentWithWorkshops>>, ApiError> {
    let items = state
        .catalog
        .list_students()
        .await
        .map_err(|err| service_error("failed to list students", err))?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/alunos/cadastro",
    tag = "alunos",
    request_body = StudentCreateRequest,
    responses(
        (status = 201, description = "Student registered", body = Student),
        (status = 400, description = "Missing required fields", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_student(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StudentCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let student = state
        .catalog
        .create_student(body)
        .await
        .map_err(|err| service_error("failed to register student", err))?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/alunos/{id}",
    tag = "alunos",
    params(("id" = u64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Fetch student", body = Student),
        (status = 404, description = "Student not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_student(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Student>, ApiError> {
    state
        .catalog
        .get_student(id)
        .await
        .map(Json)
        .map_err(|err| service_error("failed to fetch student", err))
}

#[utoipa::path(
    delete,
    path = "/alunos/{id}",
    tag = "alunos",
    params(("id" = u64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student and enrollments removed", body = MessageResponse),
        (status = 404, description = "Student not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Student has enrollments and deletes are rejected", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_student(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .catalog
        .delete_student(id)
        .await
        .map_err(|err| service_error("failed to delete student", err))?;
    Ok(Json(MessageResponse {
        message: "student deleted".to_string(),
    }))
}
