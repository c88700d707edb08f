//! Domain services between the HTTP handlers and the store.
//!
//! # Purpose
//! `EnrollmentService` owns the enroll flow; `CatalogService` validates the
//! create payloads and forwards reads and deletes. Both translate
//! [`StoreError`] into [`ServiceError`], which the API layer maps to HTTP.
use crate::store::StoreError;
use thiserror::Error;

pub mod catalog;
pub mod enrollment;

pub use catalog::CatalogService;
pub use enrollment::EnrollmentService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Storage(StoreError),
}

impl ServiceError {
    /// Short label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "invalid",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::CapacityExceeded(_) => "full",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Storage(_) => "error",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => ServiceError::NotFound(entity),
            StoreError::CapacityExceeded(message) => ServiceError::CapacityExceeded(message),
            StoreError::Conflict(message) => ServiceError::Conflict(message),
            other => ServiceError::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
