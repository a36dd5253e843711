//! Core use-case services.
//!
//! # Responsibility
//! - Own the task sequence and route every mutation through persistence.
//! - Derive filtered/sorted projections for UI callers.
//! - Keep UI/FFI layers decoupled from snapshot storage details.

pub mod projection;
pub mod task_store;
pub mod view_model;
