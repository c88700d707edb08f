//! ENCOSIS catalog and enrollment service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, services, configuration and storage backends for use
//! by the binary and integration tests.
//!
//! # Notes
//! Requests flow `api` → `service` → `store`; each layer has its own error
//! type and maps the one below it.
pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod service;
pub mod store;
