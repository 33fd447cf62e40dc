//! Durable storage for starred commits.
//!
//! Only commits a user explicitly starred are persisted; everything else lives
//! in the in-memory cache until it expires.

mod sqlite;
mod traits;

pub use sqlite::SqliteCommitStore;
pub use traits::CommitStore;
