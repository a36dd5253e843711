//! JSON file snapshot repository.
//!
//! # Responsibility
//! - Store the task snapshot as one JSON document on disk.
//!
//! # Invariants
//! - Writes go to a sibling temp file that is synced and then renamed over
//!   the target, so readers see either the old or the new snapshot.
//! - A missing file is reported as `RepoError::NotFound`.

use crate::model::task::Task;
use crate::repo::snapshot_repo::{
    decode_snapshot, encode_snapshot, RepoError, RepoResult, TaskSnapshotRepository,
};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name used when callers only supply a directory.
pub const DEFAULT_SNAPSHOT_FILE_NAME: &str = "tasks.json";

/// Snapshot repository backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotRepository {
    path: PathBuf,
}

impl JsonFileSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `DEFAULT_SNAPSHOT_FILE_NAME` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_SNAPSHOT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let extension = self
            .path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or("");
        self.path
            .with_extension(format!("{extension}.tmp.{}", std::process::id()))
    }
}

impl TaskSnapshotRepository for JsonFileSnapshotRepository {
    fn load(&self) -> RepoResult<Vec<Task>> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepoError::NotFound(self.path.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        decode_snapshot(&payload)
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let payload = encode_snapshot(tasks)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        if let Err(err) = write_synced(&temp_path, payload.as_bytes()) {
            discard_temp(&temp_path);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            discard_temp(&temp_path);
            return Err(err.into());
        }

        debug!(
            "event=snapshot_write module=repo status=ok medium=file bytes={}",
            payload.len()
        );
        Ok(())
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn discard_temp(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != ErrorKind::NotFound {
            warn!("event=snapshot_temp_cleanup module=repo status=error error={err}");
        }
    }
}
