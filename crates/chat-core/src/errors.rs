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

use thiserror::Error;

use crate::store::StoreError;

/// Base error type for chat board operations
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Message {id} not found")]
    MessageNotFound { id: i64 },
}

/// Result type alias for chat board operations
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::MessageNotFound { id: 7 };
        assert_eq!(err.to_string(), "Message 7 not found");

        let err: ChatError = StoreError::Connection("refused".to_string()).into();
        assert_eq!(err.to_string(), "Store error: Connection error: refused");
    }
}
