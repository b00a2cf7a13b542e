//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default minimum password length when `PASSWORD_MIN_LENGTH` is unset.
const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Symmetric secret used to sign session tokens. Never logged.
    pub jwt_secret: String,

    /// Directory where uploaded media files are stored
    pub upload_dir: String,

    /// Minimum accepted password length at registration / password change
    pub password_min_length: usize,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),

            password_min_length: env::var("PASSWORD_MIN_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PASSWORD_MIN_LENGTH),

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "memora=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        };

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires .env file with all config vars - run locally only
    fn test_config_from_env_loads_successfully() {
        let result = Config::from_env();
        assert!(
            result.is_ok(),
            "Config should load successfully in development environment: {}",
            result
                .err()
                .map_or("Unknown error".to_string(), |e| e.to_string())
        );

        let config = result.unwrap();
        assert!(
            !config.database_url.is_empty(),
            "DATABASE_URL should be populated"
        );
        assert!(
            !config.jwt_secret.is_empty(),
            "JWT_SECRET should be populated"
        );
        assert!(config.port > 0, "PORT should be a valid port number");
        assert!(config.password_min_length > 0);
    }
}
