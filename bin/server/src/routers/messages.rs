use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use tracing::{info, instrument};

use crate::{
    dto::{CreateMessageRequest, FieldError, MessageResponse, StatusMessage},
    error::ApiError,
    extract::ValidatedJson,
    service::ChatService,
};

/// Create messages router
pub fn create_router() -> Router {
    Router::new()
        .route("/messages", get(list_messages).post(create_message))
        .route("/messages/:message_id", delete(delete_message))
}

/// List all messages, oldest first
#[instrument(skip_all)]
async fn list_messages(
    Extension(service): Extension<Arc<ChatService>>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let messages = service.list_messages().await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Post a new message
#[instrument(skip_all)]
async fn create_message(
    Extension(service): Extension<Arc<ChatService>>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = service.post_message(request.into()).await?;
    info!(id = message.id, username = %message.username, "Message posted");
    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Delete a message by id
#[instrument(skip_all)]
async fn delete_message(
    Extension(service): Extension<Arc<ChatService>>,
    Path(message_id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let id: i64 = message_id.parse().map_err(|_| {
        ApiError::Validation(vec![FieldError::path(
            "message_id",
            "Input should be a valid integer",
            "int_parsing",
        )])
    })?;

    service.delete_message(id).await?;
    info!(id, "Message deleted");
    Ok(Json(StatusMessage::new("Successfully deleted")))
}
