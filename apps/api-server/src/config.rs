//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConfig;
use scribe_infra::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/upload`.
    pub upload_dir: PathBuf,
    pub jwt: JwtConfig,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./upload")),
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
        }
    }
}
