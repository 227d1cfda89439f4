// Error types for ghcms
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

/// Message used when a throttled response body cannot be read.
pub const THROTTLED_FALLBACK_MESSAGE: &str = "Too many requests";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport call or the response body read failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with HTTP 429. `message` is the response body.
    #[error("{message}")]
    Throttled { message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Invalid content key: {0}")]
    InvalidContentKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),
}

impl ApiError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) | ApiError::Http(_) => "transport",
            ApiError::Throttled { .. } => "throttled",
            ApiError::Store(_) => "store",
            ApiError::Fetch(_) => "fetch",
            ApiError::InvalidContentKey(_) => "content_key",
            ApiError::Config(_) | ApiError::ConfigParsing(_) => "config",
            ApiError::Io(_) => "io",
            ApiError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
