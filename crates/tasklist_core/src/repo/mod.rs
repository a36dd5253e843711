//! Snapshot persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the full-snapshot load/save contract used by the store.
//! - Provide a JSON file medium and a SQLite key-value medium.
//!
//! # Invariants
//! - Every save replaces the previous snapshot in full.
//! - An interrupted save never leaves a snapshot that fails to load.

pub mod file_repo;
pub mod snapshot_repo;
pub mod sqlite_repo;
