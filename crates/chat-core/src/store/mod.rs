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

//! Persistence layer for chat messages
//!
//! This module provides a database-agnostic interface over the `messages`
//! table. It supports SQLite and PostgreSQL backends, both built on sqlx
//! connection pools. Every operation acquires its connection from the pool
//! for the duration of the call only; the pool guard returns it on drop, so
//! no connection outlives the request that used it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::message::{Message, NewMessage};

pub mod config;
pub mod postgres;
pub mod sqlite;
pub mod types;

pub use config::{StoreConfig, StoreType};
pub use postgres::PostgresMessageStore;
pub use sqlite::SqliteMessageStore;
pub use types::{StoreError, StoreResult};

/// Storage operations the API layer relies on
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Create the schema if it does not exist yet. Safe to run repeatedly.
    async fn migrate(&self) -> StoreResult<()>;

    /// All messages, oldest first (ties broken by id)
    async fn list_all(&self) -> StoreResult<Vec<Message>>;

    /// Persist a message and return it with its generated id and timestamp
    async fn insert(&self, message: &NewMessage) -> StoreResult<Message>;

    /// Delete a message by id, returning whether a row was removed
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Check if the backend answers queries
    async fn health_check(&self) -> StoreResult<bool>;

    /// Close all pooled connections
    async fn close(&self);
}

/// Connect to the backend named by the URL scheme of `config`.
///
/// The returned store is connected but not migrated; callers run
/// [`MessageStore::migrate`] before serving traffic.
pub async fn connect(config: StoreConfig) -> StoreResult<Arc<dyn MessageStore>> {
    let store_type = config.store_type()?;
    info!(backend = %store_type, "Connecting message store");

    match store_type {
        StoreType::Sqlite => {
            let store = SqliteMessageStore::new(&config).await?;
            Ok(Arc::new(store))
        }
        StoreType::Postgres => {
            let store = PostgresMessageStore::new(&config).await?;
            Ok(Arc::new(store))
        }
    }
}
