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

//! # Chat Core
//!
//! Message model and persistence layer for the chat board.
//!
//! The crate exposes a single entity, [`Message`], and a database-agnostic
//! [`MessageStore`] trait with SQLite and PostgreSQL backends. Backends are
//! selected from the scheme of the database URL by [`store::connect`].

pub mod errors;
pub mod message;
pub mod store;

// Re-export commonly used types
pub use errors::{ChatError, ChatResult};
pub use message::{Message, NewMessage, MAX_USERNAME_LENGTH};

// Re-export the store seam
pub use store::{
    connect, MessageStore, PostgresMessageStore, SqliteMessageStore, StoreConfig, StoreError,
    StoreResult, StoreType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports() {
        let _config = StoreConfig::new("sqlite::memory:");
        let _message = NewMessage::new("alice", "hi");
        assert_eq!(MAX_USERNAME_LENGTH, 50);
    }
}
