//! till-api configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

use till_db::DbConfig;

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub http_host: String,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ApiConfig {
    /// Load configuration from a `.env` file (if any) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // a missing .env file is not an error
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./till.db".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))
    }

    /// Pool configuration for [`till_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
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

    fn config() -> ApiConfig {
        ApiConfig {
            http_host: "127.0.0.1".to_string(),
            http_port: 9090,
            database_path: "./test.db".to_string(),
            db_max_connections: 3,
            log_level: "debug".to_string(),
        }
    }

    #[test]
    fn test_bind_addr() {
        let addr = config().bind_addr().unwrap();
        assert_eq!(addr.port(), 9090);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_bad_host_is_rejected() {
        let config = ApiConfig {
            http_host: "not a host".to_string(),
            ..config()
        };
        assert!(matches!(
            config.bind_addr(),
            Err(ConfigError::InvalidValue(name)) if name == "HTTP_HOST"
        ));
    }

    #[test]
    fn test_db_config() {
        let db = config().db_config();
        assert_eq!(db.max_connections, 3);
        assert_eq!(db.database_path.to_str(), Some("./test.db"));
    }
}
