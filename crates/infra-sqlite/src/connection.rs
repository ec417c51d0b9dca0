// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use flightbook_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Default number of pooled connections for file databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Every new connection to an in-memory URL opens a fresh, empty database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// Create SQLite connection pool with WAL mode
///
/// In-memory databases get exactly one connection that is never closed,
/// so the schema and rows survive for the life of the pool.
pub async fn create_pool(config: &PoolConfig) -> Result<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| AppError::Config(format!("invalid database url: {}", e)))?
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    if !config.is_in_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    info!(
        database_url = %config.database_url,
        in_memory = config.is_in_memory(),
        "Database pool ready"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let pool = create_pool(&PoolConfig::new("sqlite::memory:")).await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(PoolConfig::new("sqlite::memory:").is_in_memory());
        assert!(PoolConfig::new("sqlite://file:test?mode=memory").is_in_memory());
        assert!(!PoolConfig::new("sqlite://flightbook.db").is_in_memory());
    }
}
