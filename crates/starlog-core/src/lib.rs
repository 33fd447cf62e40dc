//! Starlog Core - Headless library for browsing and starring repository commits.
//!
//! This crate fetches commit listings from the GitHub REST API, keeps them in
//! a sliding-expiration cache, and persists commits a user starred to SQLite.
//! It can be used programmatically without any HTTP layer; see the
//! `starlog-server` crate for the web backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use starlog_core::{CacheSettings, CommitService, GitHubCommitFetcher, GitHubSettings, SqliteCommitStore};
//!
//! #[tokio::main]
//! async fn main() -> starlog_core::Result<()> {
//!     let fetcher = GitHubCommitFetcher::new(&GitHubSettings::default())?;
//!     let store = SqliteCommitStore::new("./commits.sqlite")?;
//!     let service = CommitService::new(Arc::new(fetcher), Arc::new(store), &CacheSettings::default());
//!
//!     let commits = service.get_repo_commits("rust-lang", "rust").await;
//!     println!("Found {} commits", commits.len());
//!
//!     service.save(&commits[0].id, "rust-lang", "rust").await?;
//!     println!("Saved: {}", service.get_saved_commits().await?.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use cache::{merge_commits, CacheKey, CommitCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CacheSettings, GitHubSettings, StoreSettings};
pub use error::{Result, StarlogError};
pub use models::{normalize_commit_date, CommitRecord};
pub use network::{CommitFetcher, GitHubCommitFetcher};
pub use service::{filter_by_message, CommitService};
pub use store::{CommitStore, SqliteCommitStore};
