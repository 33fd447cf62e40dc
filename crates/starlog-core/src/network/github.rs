//! GitHub commit listing client.

use super::client::HttpClient;
use crate::config::GitHubSettings;
use crate::error::{Result, StarlogError};
use crate::models::{CommitRecord, GitHubCommit};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

/// Source of remote commits for a repository.
///
/// Implementations return parsed, unstarred records and report transport or
/// parse failures as errors; the commit service decides how to degrade.
#[async_trait]
pub trait CommitFetcher: Send + Sync {
    /// Fetch the commit listing for `owner/name`.
    async fn fetch_commits(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<CommitRecord>>;
}

/// Build the commit listing URL for `owner/name` under `base_url`.
pub fn commits_url(base_url: &str, repo_owner: &str, repo_name: &str) -> String {
    format!(
        "{}/repos/{}/{}/commits",
        base_url.trim_end_matches('/'),
        urlencoding::encode(repo_owner),
        urlencoding::encode(repo_name)
    )
}

/// Parse a commit listing body into records for `owner/name`.
///
/// The body must be a JSON array; each element is read on its own so one
/// malformed element cannot drop the rest.
pub fn parse_commit_listing(
    body: &[u8],
    repo_owner: &str,
    repo_name: &str,
) -> Result<Vec<CommitRecord>> {
    let elements: Vec<Value> = serde_json::from_slice(body).map_err(|e| StarlogError::Json {
        message: format!(
            "Failed to parse commits for {}/{}: {}",
            repo_owner, repo_name, e
        ),
        source: Some(e),
    })?;

    Ok(elements
        .iter()
        .map(|value| GitHubCommit::from_value(value).into_record(repo_owner, repo_name))
        .collect())
}

/// [`CommitFetcher`] backed by the GitHub REST API.
pub struct GitHubCommitFetcher {
    http: HttpClient,
}

impl GitHubCommitFetcher {
    /// Create a fetcher from settings.
    pub fn new(settings: &GitHubSettings) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
        })
    }
}

#[async_trait]
impl CommitFetcher for GitHubCommitFetcher {
    async fn fetch_commits(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<CommitRecord>> {
        let url = commits_url(self.http.base_url(), repo_owner, repo_name);
        let response = self.http.get(&url).await?;
        let body = response.bytes().await?;

        let commits = parse_commit_listing(&body, repo_owner, repo_name)?;

        info!(
            "Fetched {} commits from GitHub for {}/{}",
            commits.len(),
            repo_owner,
            repo_name
        );
        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commits_url() {
        assert_eq!(
            commits_url("https://api.github.com", "octocat", "Hello-World"),
            "https://api.github.com/repos/octocat/Hello-World/commits"
        );
        assert_eq!(
            commits_url("http://127.0.0.1:8080/", "o", "r"),
            "http://127.0.0.1:8080/repos/o/r/commits"
        );
    }

    #[test]
    fn test_commits_url_encodes_segments() {
        assert_eq!(
            commits_url("https://api.github.com", "a b", "c/d"),
            "https://api.github.com/repos/a%20b/c%2Fd/commits"
        );
    }

    #[test]
    fn test_parse_listing_keeps_well_formed_neighbours() {
        let body = br#"[
            {"sha": "a1", "commit": {"message": "ok", "author": {"name": "octocat", "date": "2024-04-08T06:13:59Z"}}},
            {"sha": "b2", "commit": {"message": 42}}
        ]"#;
        let commits = parse_commit_listing(body, "o", "r").unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "ok");
        assert_eq!(commits[0].date, "2024-04-08 06:13");
        assert_eq!(commits[1].id, "b2");
        assert_eq!(commits[1].message, "N/A");
        assert!(commits.iter().all(|c| c.belongs_to("o", "r")));
    }

    #[test]
    fn test_parse_listing_rejects_non_array() {
        let err = parse_commit_listing(br#"{"message": "Not Found"}"#, "o", "r").unwrap_err();
        assert!(matches!(err, StarlogError::Json { .. }));
    }

    #[tokio::test]
    async fn test_fetch_from_unreachable_host_fails() {
        // Reserve a free port, then release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let settings = GitHubSettings {
            base_url: format!("http://127.0.0.1:{}", port),
            request_timeout: std::time::Duration::from_secs(2),
            ..Default::default()
        };
        let fetcher = GitHubCommitFetcher::new(&settings).unwrap();
        let result = fetcher.fetch_commits("o", "r").await;
        assert!(result.unwrap_err().is_upstream());
    }
}
