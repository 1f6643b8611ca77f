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

//! PostgreSQL message store

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use super::config::StoreConfig;
use super::types::{StoreError, StoreResult};
use super::MessageStore;
use crate::message::{Message, NewMessage};

/// Message store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub async fn new(config: &StoreConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "PostgreSQL store connected"
        );

        Ok(Self { pool })
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations/postgres").run(&self.pool).await?;

        info!("PostgreSQL migrations checked/applied");
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
            VALUES ($1, $2)
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

        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        debug!(id, removed, "Deleted message");
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
