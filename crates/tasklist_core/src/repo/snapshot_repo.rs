//! Snapshot repository contract and JSON codec.
//!
//! # Responsibility
//! - Declare the storage-agnostic `TaskSnapshotRepository` trait.
//! - Encode/decode the ordered task sequence as JSON text.
//!
//! # Invariants
//! - Decoding preserves record order.
//! - Records failing `Task::validate()` are dropped one by one; the rest of
//!   the snapshot still loads.

use crate::db::DbError;
use crate::model::task::{Task, TaskRecord};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Snapshot persistence error.
#[derive(Debug)]
pub enum RepoError {
    /// No snapshot stored yet at the given location.
    NotFound(String),
    /// Stored content is not a valid snapshot.
    Decode(String),
    /// Task sequence could not be serialized.
    Encode(String),
    Io(std::io::Error),
    Db(DbError),
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "snapshot_not_found",
            Self::Decode(_) => "snapshot_decode_failed",
            Self::Encode(_) => "snapshot_encode_failed",
            Self::Io(_) => "snapshot_io_failed",
            Self::Db(_) => "snapshot_db_failed",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(location) => write!(f, "task snapshot not found: {location}"),
            Self::Decode(message) => write!(f, "invalid task snapshot: {message}"),
            Self::Encode(message) => write!(f, "failed to encode task snapshot: {message}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Decode(_) | Self::Encode(_) => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for the full ordered task sequence.
pub trait TaskSnapshotRepository {
    /// Reads the last saved snapshot.
    ///
    /// Returns `NotFound` when nothing was saved yet and `Decode` when the
    /// stored content is malformed.
    fn load(&self) -> RepoResult<Vec<Task>>;

    /// Replaces the stored snapshot with `tasks`.
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// Serializes tasks as a JSON array, one object per task.
pub fn encode_snapshot(tasks: &[Task]) -> RepoResult<String> {
    serde_json::to_string_pretty(tasks).map_err(|err| RepoError::Encode(err.to_string()))
}

/// Parses a JSON array produced by `encode_snapshot`.
///
/// Fails with `Decode` only when the payload is not an array of task-shaped
/// objects. Individual records with a nil id or blank title are skipped.
pub fn decode_snapshot(payload: &str) -> RepoResult<Vec<Task>> {
    let records: Vec<TaskRecord> =
        serde_json::from_str(payload).map_err(|err| RepoError::Decode(err.to_string()))?;
    let total = records.len();
    let tasks: Vec<Task> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match Task::try_from(record) {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(
                    "event=snapshot_decode module=repo status=skipped index={index} reason={err}"
                );
                None
            }
        })
        .collect();
    if tasks.len() != total {
        warn!(
            "event=snapshot_decode module=repo status=repaired dropped_invalid={}",
            total - tasks.len()
        );
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, RepoError};

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_snapshot("{\"tasks\": []}").unwrap_err();
        assert!(matches!(err, RepoError::Decode(_)));
        assert_eq!(err.code(), "snapshot_decode_failed");
    }

    #[test]
    fn decode_skips_invalid_records_and_keeps_valid_ones() {
        let payload = r#"[
            {"id": "11111111-2222-4333-8444-555555555555", "title": "keep",
             "isCompleted": false, "category": "Work", "dueDate": null, "priority": "High"},
            {"id": "22222222-2222-4333-8444-555555555555", "title": "\n",
             "isCompleted": false, "category": "Work", "dueDate": null, "priority": "Low"},
            {"id": "00000000-0000-0000-0000-000000000000", "title": "nil id",
             "isCompleted": true, "category": "Home", "dueDate": null, "priority": "Low"}
        ]"#;
        let tasks = decode_snapshot(payload).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "keep");
    }

    #[test]
    fn decode_accepts_empty_array() {
        assert!(decode_snapshot("[]").unwrap().is_empty());
    }
}
