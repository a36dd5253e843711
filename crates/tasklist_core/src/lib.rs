//! Core domain logic for the task list app.
//! This crate is the single source of truth for task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{
    filter_labels, CategoryFilter, ALL_CATEGORIES_LABEL, DEFAULT_CATEGORY, SUGGESTED_CATEGORIES,
};
pub use model::task::{normalize_title, NewTask, Priority, Task, TaskId, TaskValidationError};
pub use repo::file_repo::JsonFileSnapshotRepository;
pub use repo::snapshot_repo::{
    decode_snapshot, encode_snapshot, RepoError, RepoResult, TaskSnapshotRepository,
};
pub use repo::sqlite_repo::SqliteSnapshotRepository;
pub use service::projection::{project, remaining_count, ProjectionQuery, SortOption};
pub use service::task_store::{StoreChange, SubscriptionId, TaskStore};
pub use service::view_model::TaskViewModel;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
