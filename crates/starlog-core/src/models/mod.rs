//! Data models for Starlog.
//!
//! `commit` holds the normalized record shared by the cache, the store and the
//! HTTP layer. `github` holds the wire types of the remote commit listing API.

mod commit;
mod github;

pub use commit::{CommitRecord, STARRED_TIME_FORMAT};
pub use github::{
    normalize_commit_date, GitHubCommit, GitHubCommitAuthor, GitHubCommitDetail,
    DATE_EMPTY_PLACEHOLDER, DATE_PARSE_FAILURE, FIELD_PLACEHOLDER,
};
