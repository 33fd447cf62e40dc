//! Sliding-expiration commit cache.

use crate::config::{CacheConfig, CacheSettings};
use crate::models::CommitRecord;
use mini_moka::sync::Cache;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared, immutable snapshot of a cached commit sequence.
pub type CachedCommits = Arc<Vec<CommitRecord>>;

/// Cache entry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Merged commits for one repository.
    Repo { owner: String, name: String },
    /// Every starred commit across repositories.
    Saved,
}

impl CacheKey {
    pub fn repo(owner: impl Into<String>, name: impl Into<String>) -> Self {
        CacheKey::Repo {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Repo { owner, name } => write!(f, "{}-{}-Commits", owner, name),
            CacheKey::Saved => f.write_str(CacheConfig::SAVED_COMMITS_KEY),
        }
    }
}

/// Process-wide keyed commit cache.
///
/// Each entry expires once it has gone unread and unwritten for the configured
/// idle window. Entries are independent; there is no global invalidation.
#[derive(Clone)]
pub struct CommitCache {
    inner: Cache<CacheKey, CachedCommits>,
}

impl CommitCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let mut builder =
            Cache::<CacheKey, CachedCommits>::builder().time_to_idle(settings.time_to_idle);
        if let Some(capacity) = settings.max_capacity {
            builder = builder.max_capacity(capacity);
        }
        Self {
            inner: builder.build(),
        }
    }

    /// Live entry for `key`, resetting its idle window.
    pub fn get(&self, key: &CacheKey) -> Option<CachedCommits> {
        let hit = self.inner.get(key);
        debug!(
            "Commit cache {} for {}",
            if hit.is_some() { "hit" } else { "miss" },
            key
        );
        hit
    }

    /// Replace the entry for `key`.
    pub fn insert(&self, key: CacheKey, commits: Vec<CommitRecord>) -> CachedCommits {
        let commits = Arc::new(commits);
        self.inner.insert(key, commits.clone());
        commits
    }
}
