//! Merging stored and remote commit listings.

use crate::models::CommitRecord;
use std::collections::HashSet;

/// Concatenate `stored` then `remote` and keep the first record per id.
///
/// Stored (starred) records therefore win over freshly fetched ones with the
/// same id, and the result keeps stored-first order.
pub fn merge_commits(stored: Vec<CommitRecord>, remote: Vec<CommitRecord>) -> Vec<CommitRecord> {
    let mut seen = HashSet::with_capacity(stored.len() + remote.len());
    stored
        .into_iter()
        .chain(remote)
        .filter(|commit| seen.insert(commit.id.clone()))
        .collect()
}
