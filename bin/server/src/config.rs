use anyhow::Context;
use chat_core::StoreConfig;
use config::{Config, Environment};
use serde::Deserialize;

/// Application configuration
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Database connection URL (`sqlite:` or `postgres:` scheme)
    pub database_url: String,

    /// Maximum pooled database connections
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    StoreConfig::DEFAULT_MAX_CONNECTIONS
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_environment(Environment::default())
    }

    /// Load settings from an explicit variable map instead of the process environment
    #[cfg(test)]
    pub fn from_vars(vars: std::collections::HashMap<String, String>) -> Result<Self, anyhow::Error> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(environment: Environment) -> Result<Self, anyhow::Error> {
        let settings: Settings = Config::builder()
            .add_source(environment.try_parsing(true))
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration; DATABASE_URL must be set")?;

        Ok(settings)
    }

    /// Get the server address as a string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Persistence settings for the message store
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.database_url.clone())
            .with_max_connections(self.database_max_connections)
    }
}

// Never print the database URL; it may carry credentials.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply() {
        let settings = Settings::from_vars(vars(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();

        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.database_max_connections, 5);
        assert_eq!(settings.server_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let settings = Settings::from_vars(vars(&[
            ("DATABASE_URL", "postgres://chat:secret@db/chat"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(settings.server_address(), "127.0.0.1:9090");
        assert_eq!(settings.store_config().max_connections, 12);
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[test]
    fn test_database_url_is_required() {
        let err = Settings::from_vars(vars(&[("PORT", "9090")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
