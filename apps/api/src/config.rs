//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for local development.

use std::env;
use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Maximum database connections
    pub db_max_connections: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("FORECOURT_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FORECOURT_PORT".to_string()))?,

            database_path: env::var("FORECOURT_DB_PATH")
                .unwrap_or_else(|_| "forecourt.db".to_string())
                .into(),

            db_max_connections: env::var("FORECOURT_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("FORECOURT_DB_MAX_CONNECTIONS".to_string())
                })?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only assert defaults when the variables are unset in the test env
        if env::var("FORECOURT_PORT").is_err() && env::var("FORECOURT_DB_PATH").is_err() {
            let config = ApiConfig::load().unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.database_path, PathBuf::from("forecourt.db"));
        }
    }
}
