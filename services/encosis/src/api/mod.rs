//! ENCOSIS HTTP API module.
//!
//! # Purpose
//! Route handler modules, the shared error shape and the OpenAPI document.
//! Handlers stay thin: they extract the request, call a service and map
//! [`crate::service::ServiceError`] through [`error::service_error`].
pub mod dashboard;
pub mod enrollments;
pub mod error;
pub mod extract;
pub mod lectures;
pub mod openapi;
pub mod professors;
pub mod students;
pub mod system;
pub mod types;
pub mod workshops;
