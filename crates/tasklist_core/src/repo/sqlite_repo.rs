//! SQLite key-value snapshot repository.
//!
//! # Responsibility
//! - Store the JSON task snapshot as one row of the `snapshots` table.
//!
//! # Invariants
//! - Saves are a single upsert statement, so a row is never half-written.
//! - A missing row is reported as `RepoError::NotFound`.

use crate::db::{open_db, open_db_in_memory};
use crate::model::task::Task;
use crate::repo::snapshot_repo::{
    decode_snapshot, encode_snapshot, RepoError, RepoResult, TaskSnapshotRepository,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Row key used when callers do not supply one.
pub const DEFAULT_SNAPSHOT_KEY: &str = "tasks";

/// Snapshot repository storing one keyed record in SQLite.
pub struct SqliteSnapshotRepository {
    conn: Connection,
    key: String,
}

impl SqliteSnapshotRepository {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Opens (and migrates) a database file using the default key.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?, DEFAULT_SNAPSHOT_KEY))
    }

    /// Opens a migrated in-memory database using the default key.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?, DEFAULT_SNAPSHOT_KEY))
    }
}

impl TaskSnapshotRepository for SqliteSnapshotRepository {
    fn load(&self) -> RepoResult<Vec<Task>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => decode_snapshot(&payload),
            None => Err(RepoError::NotFound(format!("snapshots[{}]", self.key))),
        }
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let payload = encode_snapshot(tasks)?;
        self.conn.execute(
            "INSERT INTO snapshots (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload.as_str()],
        )?;

        debug!(
            "event=snapshot_write module=repo status=ok medium=sqlite bytes={}",
            payload.len()
        );
        Ok(())
    }
}
