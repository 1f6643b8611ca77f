use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// One entry of a 422 `detail` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Error located at a field of the request body
    pub fn body(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Error located at a path parameter
    pub fn path(param: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["path".to_string(), param.to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}
