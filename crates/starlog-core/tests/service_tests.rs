//! Integration tests for the CommitService public interface.
//!
//! These drive the service with a scripted in-process fetcher and a real
//! SQLite store to check merging, cache coherence and failure handling.

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use starlog_core::{
    CacheSettings, CommitFetcher, CommitRecord, CommitService, CommitStore, FixedClock,
    SqliteCommitStore, StarlogError,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Fetcher returning a configurable listing and counting calls.
#[derive(Default)]
struct ScriptedFetcher {
    commits: Mutex<Vec<CommitRecord>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl ScriptedFetcher {
    fn with_commits(commits: Vec<CommitRecord>) -> Arc<Self> {
        Arc::new(Self {
            commits: Mutex::new(commits),
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CommitFetcher for ScriptedFetcher {
    async fn fetch_commits(
        &self,
        repo_owner: &str,
        repo_name: &str,
    ) -> starlog_core::Result<Vec<CommitRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StarlogError::GitHubApi {
                message: "GitHub API returned 503".to_string(),
                status_code: Some(503),
            });
        }
        Ok(self
            .commits
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.belongs_to(repo_owner, repo_name))
            .cloned()
            .collect())
    }
}

fn remote(id: &str, message: &str) -> CommitRecord {
    CommitRecord {
        id: id.to_string(),
        message: message.to_string(),
        date: "2024-04-08 06:13".to_string(),
        author: "octocat".to_string(),
        repo_name: "r".to_string(),
        repo_owner: "o".to_string(),
        starred: false,
        starred_time: None,
    }
}

fn stored(id: &str, message: &str) -> CommitRecord {
    CommitRecord {
        starred: true,
        starred_time: Some("2024-04-10 09:00".to_string()),
        ..remote(id, message)
    }
}

struct TestEnv {
    _temp: TempDir,
    fetcher: Arc<ScriptedFetcher>,
    store: Arc<SqliteCommitStore>,
    service: CommitService,
}

fn create_test_env(remote_commits: Vec<CommitRecord>, settings: CacheSettings) -> TestEnv {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(SqliteCommitStore::new(temp.path().join("commits.sqlite")).unwrap());
    let fetcher = ScriptedFetcher::with_commits(remote_commits);
    let clock = FixedClock(Local.with_ymd_and_hms(2024, 4, 11, 18, 11, 20).unwrap());
    let service = CommitService::with_clock(
        fetcher.clone(),
        store.clone(),
        &settings,
        Arc::new(clock),
    );
    TestEnv {
        _temp: temp,
        fetcher,
        store,
        service,
    }
}

fn default_env() -> TestEnv {
    let env = create_test_env(
        vec![remote("a1", "Initial commit"), remote("b2", "Fix README typo")],
        CacheSettings::default(),
    );
    env.store
        .insert_or_replace(&stored("a1", "Initial commit"))
        .unwrap();
    env
}

fn ids(commits: &[CommitRecord]) -> Vec<&str> {
    commits.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn test_repo_commits_merge_stored_first() {
    let env = default_env();

    let commits = env.service.get_repo_commits("o", "r").await;
    assert_eq!(ids(&commits), vec!["a1", "b2"]);
    assert!(commits[0].starred);
    assert_eq!(commits[0].starred_time.as_deref(), Some("2024-04-10 09:00"));
    assert!(!commits[1].starred);
    assert!(commits[1].starred_time.is_none());
}

#[tokio::test]
async fn test_repo_commits_served_from_cache() {
    let env = default_env();

    env.service.get_repo_commits("o", "r").await;
    env.service.get_repo_commits("o", "r").await;
    env.service.search("o", "r", Some("fix")).await;
    assert_eq!(env.fetcher.calls(), 1);

    env.service.get_repo_commits("o", "other").await;
    assert_eq!(env.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_upstream_failure_degrades_to_empty_and_is_not_cached() {
    let env = default_env();
    env.fetcher.set_failing(true);

    assert!(env.service.get_repo_commits("o", "r").await.is_empty());
    assert!(env.service.search("o", "r", None).await.is_empty());

    env.fetcher.set_failing(false);
    let commits = env.service.get_repo_commits("o", "r").await;
    assert_eq!(commits.len(), 2);
    assert_eq!(env.fetcher.calls(), 3);
}

#[tokio::test]
async fn test_save_updates_both_caches_without_refetch() {
    let env = default_env();
    env.service.get_repo_commits("o", "r").await;
    let before = env.service.get_saved_commits().await.unwrap();
    assert_eq!(ids(&before), vec!["a1"]);

    let saved = env.service.save("b2", "o", "r").await.unwrap();
    assert!(saved.starred);
    assert_eq!(saved.starred_time.as_deref(), Some("2024-04-11 18:11"));

    let repo = env.service.get_repo_commits("o", "r").await;
    let b2 = repo.iter().find(|c| c.id == "b2").unwrap();
    assert!(b2.starred);

    let all_saved = env.service.get_saved_commits().await.unwrap();
    assert_eq!(ids(&all_saved), vec!["a1", "b2"]);
    assert_eq!(env.fetcher.calls(), 1);

    let persisted = env.store.get_by_id("b2").unwrap().unwrap();
    assert!(persisted.starred);
    assert_eq!(persisted.starred_time.as_deref(), Some("2024-04-11 18:11"));
}

#[tokio::test]
async fn test_save_without_cached_saved_entry_loads_store() {
    let env = default_env();

    env.service.save("b2", "o", "r").await.unwrap();
    let all_saved = env.service.get_saved_commits().await.unwrap();
    assert_eq!(ids(&all_saved), vec!["a1", "b2"]);
}

#[tokio::test]
async fn test_save_twice_keeps_one_saved_entry() {
    let env = default_env();
    env.service.get_saved_commits().await.unwrap();

    env.service.save("b2", "o", "r").await.unwrap();
    env.service.save("b2", "o", "r").await.unwrap();

    let all_saved = env.service.get_saved_commits().await.unwrap();
    assert_eq!(ids(&all_saved), vec!["a1", "b2"]);
    assert_eq!(env.store.get_all().unwrap().len(), 2);
}

#[tokio::test]
async fn test_save_unknown_commit_is_not_found() {
    let env = default_env();

    let err = env.service.save("zz", "o", "r").await.unwrap_err();
    assert!(matches!(err, StarlogError::CommitNotFound { ref commit_id } if commit_id == "zz"));
    assert!(err.is_client_error());
    assert!(env.store.get_by_id("zz").unwrap().is_none());
}

#[tokio::test]
async fn test_save_during_outage_is_not_found() {
    let env = default_env();
    env.fetcher.set_failing(true);

    let err = env.service.save("b2", "o", "r").await.unwrap_err();
    assert!(matches!(err, StarlogError::CommitNotFound { .. }));
}

#[tokio::test]
async fn test_remove_evicts_from_both_caches_and_store() {
    let env = default_env();
    env.service.get_saved_commits().await.unwrap();
    env.service.save("b2", "o", "r").await.unwrap();

    env.service.remove("b2", "o", "r").await.unwrap();

    let repo = env.service.get_repo_commits("o", "r").await;
    assert!(repo.iter().all(|c| c.id != "b2"));
    let saved = env.service.get_saved_commits().await.unwrap();
    assert!(saved.iter().all(|c| c.id != "b2"));
    assert!(env.store.get_by_id("b2").unwrap().is_none());
    assert_eq!(env.fetcher.calls(), 1);
}

#[tokio::test]
async fn test_remove_unstarred_listed_commit_succeeds() {
    let env = default_env();

    // b2 was never stored; the store delete is a no-op.
    env.service.remove("b2", "o", "r").await.unwrap();
    let repo = env.service.get_repo_commits("o", "r").await;
    assert_eq!(ids(&repo), vec!["a1"]);
}

#[tokio::test]
async fn test_remove_unknown_commit_is_not_found() {
    let env = default_env();

    let err = env.service.remove("zz", "o", "r").await.unwrap_err();
    assert!(matches!(err, StarlogError::CommitNotFound { .. }));
}

#[tokio::test]
async fn test_remove_twice_reports_not_found_second_time() {
    let env = default_env();

    env.service.remove("a1", "o", "r").await.unwrap();
    let err = env.service.remove("a1", "o", "r").await.unwrap_err();
    assert!(matches!(err, StarlogError::CommitNotFound { .. }));
}

#[tokio::test]
async fn test_remove_stored_commit_during_outage() {
    let env = default_env();
    env.service.get_saved_commits().await.unwrap();
    env.fetcher.set_failing(true);

    env.service.remove("a1", "o", "r").await.unwrap();
    assert!(env.store.get_by_id("a1").unwrap().is_none());
    assert!(env.service.get_saved_commits().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_stored_commit_of_other_repo_is_not_found() {
    let env = default_env();
    env.fetcher.set_failing(true);

    let err = env.service.remove("a1", "o", "elsewhere").await.unwrap_err();
    assert!(matches!(err, StarlogError::CommitNotFound { .. }));
    assert!(env.store.get_by_id("a1").unwrap().is_some());
}

#[tokio::test]
async fn test_search_case_insensitive() {
    let env = default_env();

    let upper = env.service.search("o", "r", Some("FIX")).await;
    let lower = env.service.search("o", "r", Some("fix")).await;
    assert_eq!(upper, lower);
    assert_eq!(ids(&upper), vec!["b2"]);

    let everything = env.service.search("o", "r", None).await;
    assert_eq!(everything.len(), 2);

    // Filtering never shrinks the cached listing.
    assert_eq!(env.service.get_repo_commits("o", "r").await.len(), 2);
}

#[tokio::test]
async fn test_search_saved() {
    let env = default_env();
    env.service.save("b2", "o", "r").await.unwrap();

    let hits = env.service.search_saved(Some("readme")).await.unwrap();
    assert_eq!(ids(&hits), vec!["b2"]);
    assert_eq!(env.service.search_saved(Some("")).await.unwrap().len(), 2);
    assert!(env
        .service
        .search_saved(Some("no such message"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_idle_entry_is_refetched() {
    let env = create_test_env(
        vec![remote("a1", "Initial commit")],
        CacheSettings {
            time_to_idle: Duration::from_millis(50),
            max_capacity: None,
        },
    );

    env.service.get_repo_commits("o", "r").await;
    assert_eq!(env.fetcher.calls(), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    env.service.get_repo_commits("o", "r").await;
    assert_eq!(env.fetcher.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_do_not_lose_updates() {
    let commits: Vec<CommitRecord> = (0..16)
        .map(|i| remote(&format!("c{:02}", i), "concurrent"))
        .collect();
    let env = Arc::new(create_test_env(commits, CacheSettings::default()));
    env.service.get_saved_commits().await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let env = env.clone();
            tokio::spawn(async move {
                env.service
                    .save(&format!("c{:02}", i), "o", "r")
                    .await
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let repo = env.service.get_repo_commits("o", "r").await;
    assert_eq!(repo.len(), 16);
    assert!(repo.iter().all(|c| c.starred));
    assert_eq!(env.service.get_saved_commits().await.unwrap().len(), 16);
    assert_eq!(env.fetcher.calls(), 1);
}
