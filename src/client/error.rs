use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification of everything that can end a task lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Seed failed the validator; never reaches the network
    Validation,
    /// Backend rejected the start request
    Submission,
    /// Transport failure, or a response that could not be used
    Network,
    /// Status query for an unknown or expired task id
    NotFound,
    /// Backend accepted the task but reports it failed
    BackendTaskFailure,
    /// Poll budget exhausted before the task finished
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation error",
            Self::Submission => "submission error",
            Self::Network => "network error",
            Self::NotFound => "task not found",
            Self::BackendTaskFailure => "backend task failure",
            Self::Timeout => "poll limit reached",
        };
        f.write_str(name)
    }
}

/// Errors returned by a [`TaskClient`](super::TaskClient)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("backend rejected the task (HTTP {status}): {message}")]
    Submission { status: u16, message: String },

    #[error("{0}")]
    Network(String),

    #[error("task '{id}' not found")]
    NotFound { id: String },

    #[error("unexpected response from backend (HTTP {status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("invalid backend endpoint: {0}")]
    Endpoint(String),
}

impl ClientError {
    /// Maps this error onto the lifecycle error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Submission { .. } => ErrorKind::Submission,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Network(_)
            | Self::UnexpectedStatus { .. }
            | Self::Decode(_)
            | Self::Endpoint(_) => ErrorKind::Network,
        }
    }

    /// Classifies a transport error from reqwest
    pub(crate) fn from_transport(url: &str, e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network(format!("Request timeout for {}", url))
        } else if e.is_connect() {
            Self::Network(format!("Connection failed for {}: {}", url, e))
        } else {
            Self::Network(format!("HTTP error for {}: {}", url, e))
        }
    }
}
