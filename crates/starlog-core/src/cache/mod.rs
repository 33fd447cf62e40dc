//! In-memory commit cache.
//!
//! Holds one entry per repository plus one aggregate entry for every saved
//! commit, each with a sliding expiration. Read-modify-write sequences on an
//! entry are serialized through [`KeyLocks`].

mod commit_cache;
mod locks;
mod merge;

pub use commit_cache::{CacheKey, CachedCommits, CommitCache};
pub use locks::{KeyGuard, KeyLocks};
pub use merge::merge_commits;
