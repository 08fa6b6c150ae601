use crate::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Caps the whole request. Expiry becomes `AppError::RequestTimeout`.
///
/// # Errors
/// Returns `AppError::RequestTimeout` if the inner handler does not finish in time.
pub async fn bound_request(State(limit): State<Duration>, req: Request, next: Next) -> Result<Response, AppError> {
    let path = req.uri().path().to_owned();
    tokio::time::timeout(limit, next.run(req)).await.map_err(|_| {
        tracing::warn!(path = %path, limit_ms = %limit.as_millis(), "Request exceeded its deadline");
        AppError::RequestTimeout
    })
}

/// JSON body whose rejections go through `AppError` instead of axum's plain-text responses.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::MalformedBody(rejection.body_text())),
        }
    }
}

/// The `{id}` path segment. Anything that is not an integer cannot name a message.
#[derive(Debug, Clone, Copy)]
pub struct MessageId(pub i64);

impl<S> FromRequestParts<S> for MessageId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Missing message id");
            AppError::NotFound
        })?;

        raw.parse::<i64>().map(Self).map_err(|_| {
            tracing::debug!(id = %raw, "Non-numeric message id");
            AppError::NotFound
        })
    }
}
