//! HTTP client for the remote commit API.
//!
//! Wraps reqwest with:
//! - Default GitHub headers (auth, accept, API version, user agent)
//! - A request deadline so upstream calls never block unbounded
//! - Pooled connections recycled after an idle period

use crate::config::{GitHubSettings, NetworkConfig};
use crate::error::{Result, StarlogError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use tracing::debug;

/// HTTP client preconfigured for one GitHub API root.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client from validated settings.
    pub fn new(settings: &GitHubSettings) -> Result<Self> {
        settings.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &settings.access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| StarlogError::Config {
                    message: format!("Invalid GitHub access token: {}", e),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_str(settings.api_version.trim()).map_err(|e| {
                StarlogError::Config {
                    message: format!("Invalid GitHub API version: {}", e),
                }
            })?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(NetworkConfig::USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .pool_idle_timeout(NetworkConfig::POOL_IDLE_TIMEOUT)
            .build()
            .map_err(|e| StarlogError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API root without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `url`, failing on any non-2xx status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::check_response_status(response, url).await
    }

    async fn check_response_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StarlogError::GitHubApi {
            message: format!("GET {} returned {}: {}", url, status, body.trim()),
            status_code: Some(status.as_u16()),
        })
    }
}
