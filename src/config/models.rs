//! Configuration data structures for ghcms.
//!
//! This module defines the schema for the application settings: the
//! provider API connection, the backoff policy, the content cache and
//! logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Provider REST API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Retry and cooldown settings for outbound requests.
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Read-through content cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the provider REST API connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL that relative request paths are resolved against.
    /// Default: `https://api.github.com`
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Access token sent as `Authorization: token <value>`.
    /// Default: none (unauthenticated requests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    /// Default: `60`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// `User-Agent` header; GitHub rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Settings for the backoff-controlled dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Last attempt number after which a failure installs a cooldown and
    /// retries. A failure on attempt `max_attempts + 1` is returned.
    /// Default: `5`
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Cooldown for attempt `n` is `n² × cooldown_unit_ms`.
    /// Default: `1000`
    #[serde(default = "default_cooldown_unit_ms")]
    pub cooldown_unit_ms: u64,
}

/// Which key-value store backs the content cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    File,
}

/// Settings for the read-through content cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default: `file`
    #[serde(default = "default_store")]
    pub store: StoreKind,

    /// Directory used by the file store.
    /// Default: `~/.ghcms/cache`
    #[serde(default = "default_cache_dir")]
    pub directory: PathBuf,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask access tokens in logged messages.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_tokens: bool,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_root", &self.api_root)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            token: None,
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cooldown_unit_ms: default_cooldown_unit_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            directory: default_cache_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_tokens: true,
        }
    }
}

// Helper functions for serde defaults
fn default_api_root() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("ghcms/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_attempts() -> u32 {
    5
}

fn default_cooldown_unit_ms() -> u64 {
    1000
}

fn default_store() -> StoreKind {
    StoreKind::File
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ghcms")
        .join("cache")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.api_root, "https://api.github.com");
        assert!(config.api.token.is_none());
        assert_eq!(config.backoff.max_attempts, 5);
        assert_eq!(config.backoff.cooldown_unit_ms, 1000);
        assert_eq!(config.cache.store, StoreKind::File);
        assert!(config.cache.directory.ends_with(".ghcms/cache"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"cache": {"store": "memory"}, "backoff": {"max_attempts": 2}}"#)
                .unwrap();
        assert_eq!(config.cache.store, StoreKind::Memory);
        assert_eq!(config.backoff.max_attempts, 2);
        assert_eq!(config.backoff.cooldown_unit_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_debug_redacts_token() {
        let api = ApiConfig {
            token: Some("ghp_abc".to_string()),
            ..ApiConfig::default()
        };
        assert!(!format!("{:?}", api).contains("ghp_abc"));
    }
}
