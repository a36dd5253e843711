//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasklist_core` linkage outside the Flutter/FFI runtime.
//! - Print the default projection of a snapshot file.
//!
//! Usage: `tasklist_cli [snapshot-path]` (falls back to
//! `TASKLIST_SNAPSHOT_PATH`, then `./tasks.json`).

use std::path::PathBuf;
use tasklist_core::{JsonFileSnapshotRepository, TaskStore, TaskViewModel};

fn main() {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TASKLIST_SNAPSHOT_PATH").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tasks.json"));

    let view_model = TaskViewModel::new(TaskStore::open(JsonFileSnapshotRepository::new(&path)));
    let projected = view_model.filtered_tasks();
    println!(
        "snapshot={} tasks={} remaining={}",
        path.display(),
        projected.len(),
        view_model.remaining_tasks()
    );
    for task in projected {
        let due = task
            .due_date
            .map(|due| due.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {} ({}, {}, due {})",
            if task.is_completed { "x" } else { " " },
            task.title,
            task.category,
            task.priority,
            due
        );
    }
}
