//! Error types for Starlog.
//!
//! A single error enum covers the upstream API, the commit store and caller
//! mistakes. The HTTP layer decides status codes from [`StarlogError::is_client_error`]
//! and [`StarlogError::is_upstream`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Starlog library.
#[derive(Debug, Error)]
pub enum StarlogError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("GitHub API error: {message}")]
    GitHubApi {
        message: String,
        status_code: Option<u16>,
    },

    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Request errors
    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Commit not found: {commit_id}")]
    CommitNotFound { commit_id: String },

    #[error("Background task failed: {0}")]
    TaskJoin(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Starlog operations.
pub type Result<T> = std::result::Result<T, StarlogError>;

impl From<std::io::Error> for StarlogError {
    fn from(err: std::io::Error) -> Self {
        StarlogError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for StarlogError {
    fn from(err: serde_json::Error) -> Self {
        StarlogError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for StarlogError {
    fn from(err: rusqlite::Error) -> Self {
        StarlogError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for StarlogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StarlogError::Timeout(crate::config::NetworkConfig::REQUEST_TIMEOUT)
        } else {
            StarlogError::Network {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }
}

impl From<tokio::task::JoinError> for StarlogError {
    fn from(err: tokio::task::JoinError) -> Self {
        StarlogError::TaskJoin(err.to_string())
    }
}

impl StarlogError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        StarlogError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether the caller caused this error (bad or unknown input).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StarlogError::InvalidParams { .. }
                | StarlogError::Validation { .. }
                | StarlogError::CommitNotFound { .. }
        )
    }

    /// Whether this error came from talking to the remote commit API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            StarlogError::Network { .. } | StarlogError::Timeout(_) | StarlogError::GitHubApi { .. }
        )
    }
}
