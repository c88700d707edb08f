//! HTTP API response types that have no counterpart in the data model.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub version: String,
    pub storage_backend: String,
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// Acknowledgement returned by the student and professor deletes.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MessageResponse {
    pub message: String,
}

/// Returned by the workshop and lecture deletes.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DeletedWithEnrollmentsResponse {
    pub message: String,
    /// Enrollment rows removed together with the parent under the cascade
    /// policy. Always zero under the reject policy.
    pub inscricoes_removidas: u64,
}
