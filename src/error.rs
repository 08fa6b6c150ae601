use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Message not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Storage operation timed out")]
    StorageTimeout,
    #[error("Request timed out")]
    RequestTimeout,
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Faults of the backing store, as opposed to client mistakes.
    #[must_use]
    pub const fn is_storage_fault(&self) -> bool {
        matches!(self, Self::Database(_) | Self::StorageTimeout)
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database(_)
            | Self::StorageTimeout
            | Self::RequestTimeout
            | Self::MalformedBody(_)
            | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::Validation(msg) => {
                tracing::debug!(message = %msg, "Validation failed");
                msg
            }
            Self::NotFound => {
                tracing::debug!("Message not found");
                "Message not found".to_string()
            }
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            Self::StorageTimeout => {
                tracing::error!("Storage operation timed out");
                "Internal server error".to_string()
            }
            Self::RequestTimeout => {
                tracing::error!("Request timed out");
                "Internal server error".to_string()
            }
            Self::MalformedBody(detail) => {
                tracing::warn!(detail = %detail, "Malformed request body");
                "Internal server error".to_string()
            }
            Self::Internal => {
                tracing::error!("Internal server error occurred");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request_with_message() {
        let (status, body) = body_of(AppError::Validation("Message content is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message content is required");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_of(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Message not found");
    }

    #[tokio::test]
    async fn test_storage_faults_are_not_leaked() {
        let (status, body) = body_of(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");

        let (status, body) = body_of(AppError::RequestTimeout).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");

        let (status, body) = body_of(AppError::MalformedBody("expected value at line 1".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_storage_fault_classification() {
        assert!(AppError::StorageTimeout.is_storage_fault());
        assert!(AppError::Database(sqlx::Error::PoolClosed).is_storage_fault());
        assert!(!AppError::NotFound.is_storage_fault());
        assert!(!AppError::Validation(String::new()).is_storage_fault());
    }
}
