/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! The chat message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest username the board accepts, in characters
pub const MAX_USERNAME_LENGTH: usize = 50;

/// A persisted chat message
///
/// `id` and `timestamp` are assigned by the store on insert and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The caller-supplied part of a message, before the store assigns identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub username: String,
    pub content: String,
}

impl NewMessage {
    pub fn new(username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_serializes_timestamp_as_rfc3339() {
        let message = Message {
            id: 1,
            username: "alice".to_string(),
            content: "hi".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["username"], "alice");
        assert_eq!(value["content"], "hi");
        assert_eq!(value["timestamp"], "2024-05-01T12:30:00Z");
    }
}
