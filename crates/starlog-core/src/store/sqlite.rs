//! SQLite-based commit store.

use super::traits::CommitStore;
use crate::config::StoreConfig;
use crate::error::{Result, StarlogError};
use crate::models::CommitRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Ordered schema migrations. Entry `n` moves the schema to version `n + 1`.
const MIGRATIONS: &[&str] = &[
    // v1: starred commits table
    r#"
    CREATE TABLE IF NOT EXISTS commits (
        id TEXT PRIMARY KEY,
        message TEXT NOT NULL,
        date TEXT NOT NULL,
        author TEXT NOT NULL,
        repo_name TEXT NOT NULL,
        repo_owner TEXT NOT NULL,
        starred INTEGER NOT NULL DEFAULT 0,
        starred_time TEXT
    );
    "#,
    // v2: per-repository lookups
    r#"
    CREATE INDEX IF NOT EXISTS idx_commits_repo
        ON commits(repo_owner, repo_name);
    "#,
];

const SELECT_COLUMNS: &str =
    "SELECT id, message, date, author, repo_name, repo_owner, starred, starred_time FROM commits";

/// SQLite-backed [`CommitStore`].
///
/// Thread-safe via internal mutex on the connection.
pub struct SqliteCommitStore {
    /// Database file, `None` for in-memory stores.
    db_path: Option<PathBuf>,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCommitStore {
    /// Open (or create) a store at the specified database path.
    ///
    /// Creates the parent directory and applies pending migrations.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StarlogError::io_with_path(e, parent))?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| StarlogError::Database {
            message: format!("Failed to open commit database: {}", e),
            source: Some(e),
        })?;

        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA busy_timeout={};",
            StoreConfig::BUSY_TIMEOUT_MS
        ))
        .map_err(|e| StarlogError::Database {
            message: format!("Failed to set pragmas: {}", e),
            source: Some(e),
        })?;

        Self::from_connection(conn, Some(db_path.to_path_buf()))
    }

    /// Create a throwaway store that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        Self::migrate(&conn)?;
        Ok(Self {
            db_path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Database file path, if file-backed.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Current schema version.
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.lock()?;
        Self::user_version(&conn)
    }

    fn user_version(conn: &Connection) -> Result<u32> {
        let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Apply every migration above the stored `user_version`.
    fn migrate(conn: &Connection) -> Result<()> {
        let current = Self::user_version(conn)? as usize;

        for (index, sql) in MIGRATIONS.iter().enumerate().skip(current) {
            let target = index + 1;
            conn.execute_batch(&format!(
                "BEGIN; {} PRAGMA user_version = {}; COMMIT;",
                sql, target
            ))
            .map_err(|e| StarlogError::Database {
                message: format!("Failed to apply schema migration v{}: {}", target, e),
                source: Some(e),
            })?;
            info!("Applied commit store migration v{}", target);
        }

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| StarlogError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CommitRecord> {
        Ok(CommitRecord {
            id: row.get(0)?,
            message: row.get(1)?,
            date: row.get(2)?,
            author: row.get(3)?,
            repo_name: row.get(4)?,
            repo_owner: row.get(5)?,
            starred: row.get(6)?,
            starred_time: row.get(7)?,
        })
    }

    fn query_records<P: rusqlite::Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> Result<Vec<CommitRecord>> {
        let mut stmt = conn.prepare(sql).map_err(|e| StarlogError::Database {
            message: format!("Failed to prepare commit query: {}", e),
            source: Some(e),
        })?;

        let records = stmt
            .query_map(params, Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }
}

impl CommitStore for SqliteCommitStore {
    fn get_by_repo(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<CommitRecord>> {
        let conn = self.lock()?;
        let records = Self::query_records(
            &conn,
            &format!(
                "{} WHERE repo_owner = ?1 AND repo_name = ?2 ORDER BY rowid",
                SELECT_COLUMNS
            ),
            params![repo_owner, repo_name],
        )?;
        debug!(
            "Loaded {} stored commits for {}/{}",
            records.len(),
            repo_owner,
            repo_name
        );
        Ok(records)
    }

    fn get_all(&self) -> Result<Vec<CommitRecord>> {
        let conn = self.lock()?;
        Self::query_records(&conn, &format!("{} ORDER BY rowid", SELECT_COLUMNS), [])
    }

    fn get_by_id(&self, id: &str) -> Result<Option<CommitRecord>> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_record,
            )
            .optional()
            .map_err(|e| StarlogError::Database {
                message: format!("Failed to query commit {}: {}", id, e),
                source: Some(e),
            })?;
        Ok(record)
    }

    fn insert_or_replace(&self, record: &CommitRecord) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO commits (id, message, date, author, repo_name, repo_owner,
                                  starred, starred_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 message=excluded.message,
                 date=excluded.date,
                 author=excluded.author,
                 repo_name=excluded.repo_name,
                 repo_owner=excluded.repo_owner,
                 starred=excluded.starred,
                 starred_time=excluded.starred_time",
            params![
                record.id,
                record.message,
                record.date,
                record.author,
                record.repo_name,
                record.repo_owner,
                record.starred,
                record.starred_time,
            ],
        )
        .map_err(|e| StarlogError::Database {
            message: format!("Failed to upsert commit {}: {}", record.id, e),
            source: Some(e),
        })?;

        debug!("Upserted commit: {}", record.id);
        Ok(())
    }

    fn delete_by_id(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM commits WHERE id = ?1", params![id])
            .map_err(|e| StarlogError::Database {
                message: format!("Failed to delete commit {}: {}", id, e),
                source: Some(e),
            })?;

        debug!("Deleted commit {} ({} rows)", id, deleted);
        Ok(deleted > 0)
    }
}
