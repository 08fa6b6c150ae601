use crate::api::AppState;
use crate::api::middleware::{ApiJson, MessageId};
use crate::api::schemas::messages::{CreateMessageRequest, MessageResponse, UpdateMessageRequest};
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Posts a new message.
///
/// # Errors
/// Returns `AppError::Validation` if the text is missing or blank.
pub async fn create_message(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateMessageRequest>,
) -> Result<impl IntoResponse> {
    let timestamp = payload.raw_timestamp();
    let msg = state.message_service.create(payload.text(), timestamp.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(msg))))
}

/// Lists all messages, newest first.
///
/// # Errors
/// Returns a storage fault if the messages cannot be read.
pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let messages = state.message_service.list().await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect::<Vec<_>>()))
}

/// Replaces the text of a message.
///
/// # Errors
/// Returns `AppError::Validation` if the text is missing or blank.
/// Returns `AppError::NotFound` if the message does not exist.
pub async fn update_message(
    State(state): State<AppState>,
    MessageId(id): MessageId,
    ApiJson(payload): ApiJson<UpdateMessageRequest>,
) -> Result<impl IntoResponse> {
    let msg = state.message_service.update(id, payload.text()).await?;

    Ok(Json(MessageResponse::from(msg)))
}

/// Deletes a message.
///
/// # Errors
/// Returns `AppError::NotFound` if the message does not exist.
pub async fn delete_message(State(state): State<AppState>, MessageId(id): MessageId) -> Result<impl IntoResponse> {
    state.message_service.remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
