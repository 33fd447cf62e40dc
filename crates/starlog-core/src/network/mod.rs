//! Network access to the remote commit API.
//!
//! This module provides:
//! - A configured HTTP client with GitHub default headers
//! - The [`CommitFetcher`] seam used by the commit service
//! - The GitHub implementation of that seam

mod client;
mod github;

pub use client::HttpClient;
pub use github::{commits_url, parse_commit_listing, CommitFetcher, GitHubCommitFetcher};
