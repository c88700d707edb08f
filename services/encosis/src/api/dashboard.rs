use crate::api::error::{ApiError, service_error};
use crate::app::AppState;
use crate::model::CatalogSummary;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Catalog totals and the latest registrations", body = CatalogSummary)
    )
)]
pub(crate) async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<CatalogSummary>, ApiError> {
    state
        .catalog
        .summary()
        .await
        .map(Json)
        .map_err(|err| service_error("failed to load dashboard", err))
}
