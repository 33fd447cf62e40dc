//! Commit service: read-through merge cache and star/unstar/search operations.
//!
//! Repository listings are served from the cache when live. On a miss the
//! service fetches remote commits, loads stored (starred) commits for the same
//! repository, merges them stored-first with one record per id, and caches the
//! result. Saving and removing keep the repository entry, the aggregate saved
//! entry and the store in step.

use crate::cache::{merge_commits, CacheKey, CachedCommits, CommitCache, KeyLocks};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheSettings;
use crate::error::{Result, StarlogError};
use crate::models::CommitRecord;
use crate::network::CommitFetcher;
use crate::store::CommitStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Keep the records whose message contains `query`, ignoring case.
///
/// `None` or an empty query keeps everything. The input is left untouched.
pub fn filter_by_message(commits: &[CommitRecord], query: Option<&str>) -> Vec<CommitRecord> {
    let needle = query.unwrap_or_default().to_lowercase();
    commits
        .iter()
        .filter(|c| c.message_contains(&needle))
        .cloned()
        .collect()
}

/// Star, unstar and search commits for repositories.
pub struct CommitService {
    fetcher: Arc<dyn CommitFetcher>,
    store: Arc<dyn CommitStore>,
    cache: CommitCache,
    locks: KeyLocks,
    clock: Arc<dyn Clock>,
}

impl CommitService {
    /// Create a service using the system clock.
    pub fn new(
        fetcher: Arc<dyn CommitFetcher>,
        store: Arc<dyn CommitStore>,
        cache_settings: &CacheSettings,
    ) -> Self {
        Self::with_clock(fetcher, store, cache_settings, Arc::new(SystemClock))
    }

    /// Create a service with an explicit time source.
    pub fn with_clock(
        fetcher: Arc<dyn CommitFetcher>,
        store: Arc<dyn CommitStore>,
        cache_settings: &CacheSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            store,
            cache: CommitCache::new(cache_settings),
            locks: KeyLocks::new(),
            clock,
        }
    }

    /// Merged commits for `owner/name`.
    ///
    /// Upstream or store failures are logged and yield an empty, uncached
    /// listing.
    pub async fn get_repo_commits(&self, repo_owner: &str, repo_name: &str) -> Vec<CommitRecord> {
        self.repo_snapshot(repo_owner, repo_name)
            .await
            .map(|commits| commits.as_ref().clone())
            .unwrap_or_default()
    }

    /// Every starred commit.
    pub async fn get_saved_commits(&self) -> Result<Vec<CommitRecord>> {
        Ok(self.saved_snapshot().await?.as_ref().clone())
    }

    /// Star `commit_id` in `owner/name` and persist it.
    ///
    /// Returns the starred record, or [`StarlogError::CommitNotFound`] when the
    /// id is not part of the repository listing.
    pub async fn save(
        &self,
        commit_id: &str,
        repo_owner: &str,
        repo_name: &str,
    ) -> Result<CommitRecord> {
        let repo_key = CacheKey::repo(repo_owner, repo_name);
        let _repo_guard = self.locks.lock(&repo_key).await;

        let commits = self
            .resolve_repo(&repo_key, repo_owner, repo_name)
            .await
            .unwrap_or_default();
        let index = commits
            .iter()
            .position(|c| c.id == commit_id)
            .ok_or_else(|| StarlogError::CommitNotFound {
                commit_id: commit_id.to_string(),
            })?;

        let mut updated = commits.as_ref().clone();
        updated[index].star(self.clock.now());
        let record = updated[index].clone();

        let to_store = record.clone();
        self.run_store(move |store| store.insert_or_replace(&to_store))
            .await?;
        self.cache.insert(repo_key, updated);

        let _saved_guard = self.locks.lock(&CacheKey::Saved).await;
        match self.cache.get(&CacheKey::Saved) {
            Some(saved) => {
                let mut saved = saved.as_ref().clone();
                match saved.iter_mut().find(|c| c.id == record.id) {
                    Some(existing) => *existing = record.clone(),
                    None => saved.push(record.clone()),
                }
                self.cache.insert(CacheKey::Saved, saved);
            }
            None => match self.run_store(|store| store.get_all()).await {
                Ok(all) => {
                    self.cache.insert(CacheKey::Saved, all);
                }
                Err(e) => warn!("Saved commits not cached after starring {}: {}", record.id, e),
            },
        }

        info!("Starred commit {} in {}/{}", record.id, repo_owner, repo_name);
        Ok(record)
    }

    /// Unstar `commit_id` in `owner/name`.
    ///
    /// The commit is dropped from the repository listing and the saved
    /// listing, and deleted from the store; deleting an id the store does not
    /// hold is not an error. When the listing lacks the id, a stored record for
    /// the same repository is still removed. Otherwise the result is
    /// [`StarlogError::CommitNotFound`].
    pub async fn remove(&self, commit_id: &str, repo_owner: &str, repo_name: &str) -> Result<()> {
        let repo_key = CacheKey::repo(repo_owner, repo_name);
        let _repo_guard = self.locks.lock(&repo_key).await;

        let commits = self.resolve_repo(&repo_key, repo_owner, repo_name).await;
        let listed = commits
            .as_ref()
            .is_some_and(|c| c.iter().any(|commit| commit.id == commit_id));

        if !listed {
            let id = commit_id.to_string();
            let stored = self.run_store(move |store| store.get_by_id(&id)).await?;
            if !stored.is_some_and(|c| c.belongs_to(repo_owner, repo_name)) {
                return Err(StarlogError::CommitNotFound {
                    commit_id: commit_id.to_string(),
                });
            }
            debug!(
                "Commit {} missing from {}/{} listing, removing stored copy",
                commit_id, repo_owner, repo_name
            );
        }

        let id = commit_id.to_string();
        let existed = self.run_store(move |store| store.delete_by_id(&id)).await?;
        debug!("Store delete for {}: existed={}", commit_id, existed);

        if let Some(commits) = commits.filter(|_| listed) {
            let remaining: Vec<CommitRecord> = commits
                .iter()
                .filter(|c| c.id != commit_id)
                .cloned()
                .collect();
            self.cache.insert(repo_key, remaining);
        }

        let _saved_guard = self.locks.lock(&CacheKey::Saved).await;
        if let Some(saved) = self.cache.get(&CacheKey::Saved) {
            if saved.iter().any(|c| c.id == commit_id) {
                let remaining: Vec<CommitRecord> = saved
                    .iter()
                    .filter(|c| c.id != commit_id)
                    .cloned()
                    .collect();
                self.cache.insert(CacheKey::Saved, remaining);
            }
        }

        info!("Removed commit {} from {}/{}", commit_id, repo_owner, repo_name);
        Ok(())
    }

    /// Repository commits whose message contains `query`, ignoring case.
    pub async fn search(
        &self,
        repo_owner: &str,
        repo_name: &str,
        query: Option<&str>,
    ) -> Vec<CommitRecord> {
        match self.repo_snapshot(repo_owner, repo_name).await {
            Some(commits) => filter_by_message(&commits, query),
            None => Vec::new(),
        }
    }

    /// Starred commits whose message contains `query`, ignoring case.
    pub async fn search_saved(&self, query: Option<&str>) -> Result<Vec<CommitRecord>> {
        let saved = self.saved_snapshot().await?;
        Ok(filter_by_message(&saved, query))
    }

    async fn repo_snapshot(&self, repo_owner: &str, repo_name: &str) -> Option<CachedCommits> {
        let key = CacheKey::repo(repo_owner, repo_name);
        if let Some(commits) = self.cache.get(&key) {
            return Some(commits);
        }

        let _guard = self.locks.lock(&key).await;
        self.resolve_repo(&key, repo_owner, repo_name).await
    }

    async fn saved_snapshot(&self) -> Result<CachedCommits> {
        if let Some(saved) = self.cache.get(&CacheKey::Saved) {
            return Ok(saved);
        }

        let _guard = self.locks.lock(&CacheKey::Saved).await;
        if let Some(saved) = self.cache.get(&CacheKey::Saved) {
            return Ok(saved);
        }

        let all = self.run_store(|store| store.get_all()).await?;
        debug!("Loaded {} saved commits from store", all.len());
        Ok(self.cache.insert(CacheKey::Saved, all))
    }

    /// Cached listing for `key`, filling it on a miss. Caller holds the key's lock.
    async fn resolve_repo(
        &self,
        key: &CacheKey,
        repo_owner: &str,
        repo_name: &str,
    ) -> Option<CachedCommits> {
        if let Some(commits) = self.cache.get(key) {
            return Some(commits);
        }

        match self.load_repo(repo_owner, repo_name).await {
            Ok(merged) => Some(self.cache.insert(key.clone(), merged)),
            Err(e) => {
                warn!(
                    "Error fetching commits for {}/{}: {}",
                    repo_owner, repo_name, e
                );
                None
            }
        }
    }

    async fn load_repo(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<CommitRecord>> {
        let remote = self.fetcher.fetch_commits(repo_owner, repo_name).await?;

        let (owner, name) = (repo_owner.to_string(), repo_name.to_string());
        let stored = self
            .run_store(move |store| store.get_by_repo(&owner, &name))
            .await?;

        let merged = merge_commits(stored, remote);
        debug!(
            "Merged {} commits for {}/{}",
            merged.len(),
            repo_owner,
            repo_name
        );
        Ok(merged)
    }

    async fn run_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CommitStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref())).await?
    }
}
