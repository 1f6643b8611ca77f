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

//! SQLite message store

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::config::StoreConfig;
use super::types::{StoreError, StoreResult};
use super::MessageStore;
use crate::message::{Message, NewMessage};

/// Message store backed by a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Open the database named by `config.url`.
    ///
    /// `sqlite::memory:` opens a fresh in-memory database that lives as long
    /// as the store; file databases are created if missing.
    pub async fn new(config: &StoreConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?
            .create_if_missing(true);

        let pool = if config.is_in_memory() {
            // sqlx names every parsed `:memory:` URL uniquely, so each store
            // gets its own database. It disappears with its last connection,
            // so the single connection is never reaped.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(config.acquire_timeout())
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout())
                .idle_timeout(Some(config.idle_timeout()))
                .test_before_acquire(true)
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?
        };

        info!(in_memory = config.is_in_memory(), "SQLite store connected");

        Ok(Self { pool })
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations/sqlite").run(&self.pool).await?;

        info!("SQLite migrations checked/applied");
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<Message>> {
        let mut conn = self.pool.acquire().await?;

        let messages: Vec<Message> = sqlx::query_as(
            r#"
            SELECT id, username, content, timestamp
            FROM messages
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        debug!(count = messages.len(), "Listed messages");
        Ok(messages)
    }

    async fn insert(&self, message: &NewMessage) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;

        let created: Message = sqlx::query_as(
            r#"
            INSERT INTO messages (username, content)
            VALUES (?, ?)
            RETURNING id, username, content, timestamp
            "#,
        )
        .bind(&message.username)
        .bind(&message.content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = created.id, username = %created.username, "Inserted message");
        Ok(created)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        debug!(id, removed, "Deleted message");
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    async fn memory_store() -> SqliteMessageStore {
        let store = SqliteMessageStore::new(&StoreConfig::new("sqlite::memory:"))
            .await
            .unwrap();
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = memory_store().await;
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = memory_store().await;
        let before = Utc::now() - Duration::seconds(1);

        let created = store.insert(&NewMessage::new("alice", "hi")).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.username, "alice");
        assert_eq!(created.content, "hi");
        assert!(created.timestamp >= before);
        assert!(created.timestamp <= Utc::now() + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_list_all_returns_insertion_order() {
        let store = memory_store().await;
        for (user, text) in [("alice", "first"), ("bob", "second"), ("carol", "third")] {
            store.insert(&NewMessage::new(user, text)).await.unwrap();
        }

        let messages = store.list_all().await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert!(messages
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp && pair[0].id < pair[1].id));
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let store = memory_store().await;
        let first = store.insert(&NewMessage::new("alice", "one")).await.unwrap();
        let second = store.insert(&NewMessage::new("bob", "two")).await.unwrap();

        assert!(store.delete(first.id).await.unwrap());
        assert!(!store.delete(first.id).await.unwrap());

        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining, vec![second]);
    }

    #[tokio::test]
    async fn test_delete_missing_id_has_no_effect() {
        let store = memory_store().await;
        store.insert(&NewMessage::new("alice", "one")).await.unwrap();

        assert!(!store.delete(42).await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = memory_store().await;
        store.insert(&NewMessage::new("alice", "one")).await.unwrap();
        let second = store.insert(&NewMessage::new("alice", "two")).await.unwrap();
        assert!(store.delete(second.id).await.unwrap());

        let third = store.insert(&NewMessage::new("alice", "three")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_schema_rejects_invalid_rows() {
        let store = memory_store().await;

        let err = store.insert(&NewMessage::new("", "hi")).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));

        let err = store.insert(&NewMessage::new("alice", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));

        let err = store
            .insert(&NewMessage::new("a".repeat(51), "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));

        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_username_length_counts_characters() {
        let store = memory_store().await;
        let created = store
            .insert(&NewMessage::new("é".repeat(50), "hi"))
            .await
            .unwrap();
        assert_eq!(created.username.chars().count(), 50);
    }

    #[tokio::test]
    async fn test_memory_stores_are_isolated() {
        let a = memory_store().await;
        let b = memory_store().await;
        a.insert(&NewMessage::new("alice", "hi")).await.unwrap();

        assert_eq!(a.list_all().await.unwrap().len(), 1);
        assert!(b.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("chat.db").display());

        let store = SqliteMessageStore::new(&StoreConfig::new(url.clone()))
            .await
            .unwrap();
        store.migrate().await.unwrap();
        let created = store.insert(&NewMessage::new("alice", "hi")).await.unwrap();
        store.close().await;

        let reopened = SqliteMessageStore::new(&StoreConfig::new(url)).await.unwrap();
        reopened.migrate().await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap(), vec![created]);
        assert!(reopened.health_check().await.unwrap());
        reopened.close().await;
    }
}
