use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DB_NAME: &str = "student_attendance_db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Connection string for the document store (`MONGO_URI`).
    pub mongo_uri: String,
    /// Database holding the `students`, `courses` and `attendance` collections (`DB_NAME`).
    pub db_name: String,
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Listening port (`PORT`).
    pub port: u16,
    /// Default filter directive when `RUST_LOG` is unset (`LOG_LEVEL`).
    pub log_level: String,
    /// When set, logs are also written to a daily rolling file in this directory (`LOG_DIR`).
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mongo_uri.trim().is_empty() {
            return Err(ConfigError::ValidationError("mongo_uri must not be empty".to_string()));
        }
        if self.db_name.trim().is_empty() {
            return Err(ConfigError::ValidationError("db_name must not be empty".to_string()));
        }
        self.socket_addr().map(|_| ())
    }

    /// The address the HTTP server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid host '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
