use chat_core::{Message, NewMessage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to post a message
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(
        min = 1,
        max = 50,
        code = "string_length",
        message = "username must be between 1 and 50 characters"
    ))]
    pub username: String,
    #[validate(length(
        min = 1,
        code = "string_too_short",
        message = "content must not be empty"
    ))]
    pub content: String,
}

impl From<CreateMessageRequest> for NewMessage {
    fn from(request: CreateMessageRequest) -> Self {
        NewMessage::new(request.username, request.content)
    }
}

/// A message as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            username: message.username,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::MAX_USERNAME_LENGTH;

    fn request(username: &str, content: &str) -> CreateMessageRequest {
        CreateMessageRequest {
            username: username.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request("alice", "hi").validate().is_ok());
        assert!(request(&"a".repeat(MAX_USERNAME_LENGTH), "x").validate().is_ok());
        // Length is counted in characters, not bytes.
        assert!(request(&"é".repeat(MAX_USERNAME_LENGTH), "x").validate().is_ok());
    }

    #[test]
    fn test_empty_fields_fail() {
        let errors = request("", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_long_username_fails() {
        let errors = request(&"a".repeat(MAX_USERNAME_LENGTH + 1), "hi")
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.keys().any(|k| k.to_string() == "username"));
    }
}
