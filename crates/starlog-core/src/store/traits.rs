//! Commit store trait.

use crate::error::Result;
use crate::models::CommitRecord;

/// Keyed storage for starred commit records.
///
/// All operations are synchronous to match rusqlite's API; async callers
/// move them onto the blocking pool.
pub trait CommitStore: Send + Sync {
    /// Stored commits for the repository `owner/name`.
    fn get_by_repo(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<CommitRecord>>;

    /// Every stored commit.
    fn get_all(&self) -> Result<Vec<CommitRecord>>;

    /// A single commit by id.
    fn get_by_id(&self, id: &str) -> Result<Option<CommitRecord>>;

    /// Insert, or overwrite the record with the same id.
    fn insert_or_replace(&self, record: &CommitRecord) -> Result<()>;

    /// Delete by id. Returns whether a row existed; deleting a missing id is
    /// not an error.
    fn delete_by_id(&self, id: &str) -> Result<bool>;
}
