//! Server configuration from the environment

use crate::store::{MemoryStore, SessionStore, SqliteStore, StoreResult};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:codechess.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// `DATABASE_URL` value that selects the in-memory store
pub const MEMORY_DATABASE: &str = "memory";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Read `CODECHESS_BIND_ADDR`, `DATABASE_URL` and
    /// `CODECHESS_MAX_CONNECTIONS`, loading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("CODECHESS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::InvalidValue {
            name: "CODECHESS_BIND_ADDR",
            value: bind.clone(),
        })?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match lookup("CODECHESS_MAX_CONNECTIONS") {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "CODECHESS_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(ServerConfig {
            bind_addr,
            database_url,
            max_connections,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE
    }

    /// Build the session store this configuration names
    pub async fn open_store(&self) -> StoreResult<Arc<dyn SessionStore>> {
        if self.uses_memory_store() {
            info!("[STORE] Using in-memory session store");
            return Ok(Arc::new(MemoryStore::new()));
        }
        let store = SqliteStore::connect(&self.database_url, self.max_connections).await?;
        Ok(Arc::new(store))
    }
}
