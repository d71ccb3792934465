//! Configuration module for the catalog client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URI of the REST backend, without trailing slash
    pub base_uri: String,
    /// Resource path segment of the Flug feature area
    pub fluege_path: String,
    /// Resource path segment of the Spiel feature area
    pub spiele_path: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Number of versioned records kept for lookups by identifier
    pub cache_capacity: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_uri = env::var("KATALOG_BASE_URI")
            .unwrap_or_else(|_| "http://localhost:8080/rest".to_string())
            .trim_end_matches('/')
            .to_string();

        let fluege_path = env::var("KATALOG_FLUEGE_PATH").unwrap_or_else(|_| "fluege".to_string());
        let spiele_path = env::var("KATALOG_SPIELE_PATH").unwrap_or_else(|_| "spiele".to_string());

        let api_token = env::var("KATALOG_API_TOKEN").ok().filter(|t| !t.is_empty());

        let timeout = env::var("KATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| match secs.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!("Ignoring invalid KATALOG_TIMEOUT_SECS: {}", secs);
                    None
                }
            });

        let cache_capacity = env::var("KATALOG_CACHE_CAPACITY")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(1);

        let log_level = env::var("KATALOG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("KATALOG_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            base_uri,
            fluege_path,
            spiele_path,
            api_token,
            timeout,
            cache_capacity,
            log_level,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("KATALOG_BASE_URI");
        env::remove_var("KATALOG_FLUEGE_PATH");
        env::remove_var("KATALOG_SPIELE_PATH");
        env::remove_var("KATALOG_API_TOKEN");
        env::remove_var("KATALOG_TIMEOUT_SECS");
        env::remove_var("KATALOG_CACHE_CAPACITY");
        env::remove_var("KATALOG_LOG_LEVEL");
        env::remove_var("KATALOG_LOG_FORMAT");

        let config = Config::from_env();

        assert_eq!(config.base_uri, "http://localhost:8080/rest");
        assert_eq!(config.fluege_path, "fluege");
        assert_eq!(config.spiele_path, "spiele");
        assert!(config.api_token.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.cache_capacity, 1);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }
}
