//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::env;

use pharma_core::DEFAULT_EXPIRY_WARNING_DAYS;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Reject cash sales where the amount tendered does not cover the
    /// total. Off by default: the historical behavior is to record the
    /// shortfall as negative change.
    pub reject_underpayment: bool,

    /// Days before expiry at which the alert scan starts warning
    pub expiry_warning_days: i64,

    /// Directory for JSON backups
    pub backup_dir: String,

    /// Whether to run the daily alert scan in the background
    pub alert_scan_enabled: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/pharmacare.db".to_string()),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "pharmacare-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            reject_underpayment: env::var("REJECT_UNDERPAYMENT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            expiry_warning_days: env::var("EXPIRY_WARNING_DAYS")
                .unwrap_or_else(|_| DEFAULT_EXPIRY_WARNING_DAYS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("EXPIRY_WARNING_DAYS".to_string()))?,

            backup_dir: env::var("BACKUP_DIR").unwrap_or_else(|_| "./backups".to_string()),

            alert_scan_enabled: env::var("ALERT_SCAN_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        // No env vars set in the test runner for these keys.
        let config = ApiConfig::load().unwrap();
        assert_eq!(config.http_port, 3001);
        assert!(!config.reject_underpayment);
        assert_eq!(config.expiry_warning_days, DEFAULT_EXPIRY_WARNING_DAYS);
    }
}
