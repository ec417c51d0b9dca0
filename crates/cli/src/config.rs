// Runtime configuration (environment + command-line flags)

use chrono::NaiveDateTime;
use flightbook_core::error::{AppError, Result};
use flightbook_infra_sqlite::PoolConfig;

pub const DEFAULT_DB_URL: &str = "sqlite://flightbook.db";
pub const LOG_FORMAT_ENV: &str = "FLIGHTBOOK_LOG_FORMAT";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything other than `json` falls back to pretty output
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or(LogFormat::Pretty)
    }
}

/// Validate the database flags and turn them into a pool configuration
pub fn pool_config(database_url: &str, max_connections: u32) -> Result<PoolConfig> {
    if database_url.trim().is_empty() {
        return Err(AppError::Config("database url must not be empty".to_string()));
    }
    if max_connections == 0 {
        return Err(AppError::Config(
            "max connections must be at least 1".to_string(),
        ));
    }

    Ok(PoolConfig {
        database_url: database_url.to_string(),
        max_connections,
    })
}

/// clap value parser for local wall-clock timestamps
pub fn parse_datetime(value: &str) -> std::result::Result<NaiveDateTime, String> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got '{}'", value))
}
