//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its attribute types.
//! - Define category labels and the category filter.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is physical; there is no tombstone state.

pub mod category;
pub mod task;
