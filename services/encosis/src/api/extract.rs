//! Request body extraction.
//!
//! `ApiJson<T>` behaves like `axum::Json<T>` but rejects unreadable bodies
//! (bad syntax, wrong field types, negative ids, missing content type) with
//! the same 400 `validation_error` body as every other invalid input.
use crate::api::error::{ApiError, api_validation_error};
use axum::Json;
use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                Err(api_validation_error(&rejection.body_text()))
            }
        }
    }
}
