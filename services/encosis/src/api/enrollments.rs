//! Enrollment API handlers.
//!
//! # Purpose
//! `POST /alunos/oficinas/inscrever` and `POST /alunos/palestras/inscrever`.
//! Both delegate to [`crate::service::EnrollmentService`], which performs the
//! seat check and the row insert as one atomic unit.
//!
//! # Key invariants
//! - A 409 `capacity_exceeded` response means nothing was written.
//! - A 201 response means exactly one seat was taken and one row inserted.
use crate::api::error::{ApiError, service_error};
use crate::api::extract::ApiJson;
use crate::app::AppState;
use crate::model::{EnrollmentRequest, LectureEnrollmentRequest};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    post,
    path = "/alunos/oficinas/inscrever",
    tag = "inscricoes",
    request_body = EnrollmentRequest,
    responses(
        (status = 201, description = "Student enrolled; one seat taken", body = crate::model::Enrollment),
        (status = 400, description = "Missing or malformed aluno_id or oficina_id", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Student or workshop not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "No seats left or already enrolled", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn enroll_workshop(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<EnrollmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let enrollment = state
        .enrollment
        .enroll(body)
        .await
        .map_err(|err| service_error("failed to enroll student", err))?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    post,
    path = "/alunos/palestras/inscrever",
    tag = "inscricoes",
    request_body = LectureEnrollmentRequest,
    responses(
        (status = 201, description = "Student enrolled in the lecture", body = crate::model::LectureEnrollment),
        (status = 400, description = "Missing or malformed aluno_id or palestra_id", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Student or lecture not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Lecture is full or already enrolled", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn enroll_lecture(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LectureEnrollmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let enrollment = state
        .enrollment
        .enroll_lecture(body)
        .await
        .map_err(|err| service_error("failed to enroll student", err))?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}
