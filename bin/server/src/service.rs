use std::sync::Arc;

use anyhow::{Context, Result};
use chat_core::{connect, ChatError, ChatResult, Message, MessageStore, NewMessage};
use tracing::{info, warn};

use crate::config::Settings;

/// Service layer that owns the message store and provides the board operations
pub struct ChatService {
    store: Arc<dyn MessageStore>,
}

impl ChatService {
    /// Connect to the configured database and bring its schema up to date
    pub async fn new(settings: &Settings) -> Result<Self> {
        let store = connect(settings.store_config())
            .await
            .context("failed to connect to the database")?;

        let service = Self::with_store(store);
        service.migrate().await?;

        Ok(service)
    }

    /// Wrap an already connected store
    pub fn with_store(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Create the schema before any traffic is accepted
    pub async fn migrate(&self) -> Result<()> {
        self.store
            .migrate()
            .await
            .context("failed to run database migrations")?;

        info!("Message schema ready");
        Ok(())
    }

    /// All messages, oldest first
    pub async fn list_messages(&self) -> ChatResult<Vec<Message>> {
        Ok(self.store.list_all().await?)
    }

    /// Store a new message
    pub async fn post_message(&self, message: NewMessage) -> ChatResult<Message> {
        Ok(self.store.insert(&message).await?)
    }

    /// Delete a message, failing if it does not exist
    pub async fn delete_message(&self, id: i64) -> ChatResult<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(ChatError::MessageNotFound { id })
        }
    }

    /// Whether the store currently answers queries
    pub async fn is_healthy(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(err) => {
                warn!(error = %err, "Store health check failed");
                false
            }
        }
    }

    /// Release pooled connections
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}
