//! Centralized configuration for Starlog.
//!
//! Compile-time defaults live as associated constants on unit structs. The
//! runtime settings structs are filled once at process startup and never
//! reloaded.

use crate::error::{Result, StarlogError};
use std::path::PathBuf;
use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Starlog";
    pub const DATA_DIR_NAME: &'static str = "starlog";
    pub const DATABASE_FILENAME: &'static str = "commits.sqlite";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(120);
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const GITHUB_API_VERSION: &'static str = "2022-11-28";
    pub const USER_AGENT: &'static str = "CommitsReader";
}

/// Commit cache defaults.
pub struct CacheConfig;

impl CacheConfig {
    /// Sliding expiration window for every cache entry.
    pub const TIME_TO_IDLE: Duration = Duration::from_secs(300);
    /// Key of the aggregate "all saved commits" entry.
    pub const SAVED_COMMITS_KEY: &'static str = "saved-Commits";
}

/// Commit store defaults.
pub struct StoreConfig;

impl StoreConfig {
    pub const BUSY_TIMEOUT_MS: u32 = 30_000;
}

/// Settings for the remote commit API.
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    /// API root, e.g. `https://api.github.com`.
    pub base_url: String,
    /// Personal access token. Anonymous requests when `None`.
    pub access_token: Option<String>,
    /// Value for the `X-GitHub-Api-Version` header.
    pub api_version: String,
    /// Per-request deadline.
    pub request_timeout: Duration,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            base_url: NetworkConfig::GITHUB_API_BASE.to_string(),
            access_token: None,
            api_version: NetworkConfig::GITHUB_API_VERSION.to_string(),
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }
}

impl GitHubSettings {
    /// Reject settings that cannot produce a working client.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| StarlogError::Config {
            message: format!("Invalid GitHub base URL '{}': {}", self.base_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StarlogError::Config {
                message: format!("Unsupported GitHub base URL scheme: {}", url.scheme()),
            });
        }
        if self.api_version.trim().is_empty() {
            return Err(StarlogError::Config {
                message: "GitHub API version must not be empty".to_string(),
            });
        }
        if let Some(token) = &self.access_token {
            if token.trim().is_empty() {
                return Err(StarlogError::Config {
                    message: "GitHub access token is set but empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Settings for the durable commit store.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub database_path: PathBuf,
}

impl StoreSettings {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }
}

/// Settings for the in-memory commit cache.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Sliding expiration per entry.
    pub time_to_idle: Duration,
    /// Optional entry bound. `None` keeps every live key.
    pub max_capacity: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            time_to_idle: CacheConfig::TIME_TO_IDLE,
            max_capacity: None,
        }
    }
}
