//! Crawl-Watch: client-side orchestration of server-executed crawl tasks
//!
//! This crate submits a crawl task to a backend service, polls its status
//! until it reaches a terminal state, and publishes a single observable
//! snapshot of the "current" task. Starting a new task supersedes the
//! previous one cleanly.

pub mod client;
pub mod config;
pub mod orchestrator;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Crawl-Watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Task client error: {0}")]
    Client(#[from] client::ClientError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// A task seed was refused before any network call was made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not an acceptable seed URL: {reason}")]
pub struct ValidationError {
    /// The rejected input, as given
    pub input: String,
    /// Why the input was rejected
    pub reason: UrlError,
}

/// Reasons a seed URL fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("input is empty")]
    Empty,

    #[error("unsupported scheme '{0}'")]
    InvalidScheme(String),

    #[error("missing host")]
    MissingDomain,

    #[error("invalid host '{0}'")]
    InvalidHost(String),

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Crawl-Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use client::{ClientError, ErrorKind, HttpTaskClient, TaskClient};
pub use config::Config;
pub use orchestrator::{Generation, Orchestrator, PollSettings, TaskSnapshot};
pub use url::{is_valid_seed, TaskSeed};
