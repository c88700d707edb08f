//! ENCOSIS HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::observability;
use crate::service::{CatalogService, EnrollmentService};
use crate::store::CatalogStore;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub api_version: String,
    pub store: Arc<dyn CatalogStore>,
    pub catalog: CatalogService,
    pub enrollment: EnrollmentService,
}

impl AppState {
    /// Build the state and both services around one shared store.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            service_name: "encosis".to_string(),
            api_version: env!("CARGO_PKG_VERSION").to_string(),
            catalog: CatalogService::new(store.clone()),
            enrollment: EnrollmentService::new(store.clone()),
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/system/info", get(api::system::system_info))
        .route("/system/health", get(api::system::system_health))
        .route("/alunos", get(api::students::list_students))
        .route("/alunos/cadastro", post(api::students::create_student))
        .route(
            "/alunos/:id",
            get(api::students::get_student).delete(api::students::delete_student),
        )
        .route(
            "/alunos/oficinas/inscrever",
            post(api::enrollments::enroll_workshop),
        )
        .route(
            "/alunos/palestras/inscrever",
            post(api::enrollments::enroll_lecture),
        )
        .route("/professores", get(api::professors::list_professors))
        .route(
            "/professores/cadastro",
            post(api::professors::create_professor),
        )
        .route(
            "/professores/:id",
            get(api::professors::get_professor).delete(api::professors::delete_professor),
        )
        .route("/oficinas", get(api::workshops::list_workshops))
        .route("/oficinas/cadastro", post(api::workshops::create_workshop))
        .route(
            "/oficinas/:id",
            get(api::workshops::get_workshop).delete(api::workshops::delete_workshop),
        )
        .route(
            "/oficinas/:id/inscricoes",
            get(api::workshops::list_workshop_enrollments),
        )
        .route("/palestras", get(api::lectures::list_lectures))
        .route("/palestras/cadastro", post(api::lectures::create_lecture))
        .route(
            "/palestras/:id",
            get(api::lectures::get_lecture).delete(api::lectures::delete_lecture),
        )
        .route("/dashboard", get(api::dashboard::dashboard))
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
