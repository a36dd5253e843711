//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task intents (add/toggle/delete, filter/sort) to Dart via FRB.
//! - Hold the single process-wide task view model.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Task ids cross the boundary as UUID strings, dates as epoch millis.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tasklist_core::{
    core_version as core_version_inner, filter_labels, init_logging as init_logging_inner,
    ping as ping_inner, remaining_count, JsonFileSnapshotRepository, NewTask, Priority, SortOption,
    Task, TaskId, TaskStore, TaskViewModel, DEFAULT_CATEGORY,
};

const SNAPSHOT_PATH_ENV: &str = "TASKLIST_SNAPSHOT_PATH";
const DEFAULT_SNAPSHOT_FILE_NAME: &str = "tasklist_tasks.json";

type FileViewModel = TaskViewModel<JsonFileSnapshotRepository>;

static TASKS: Mutex<Option<FileViewModel>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and an error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One task row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub category: String,
    /// Due instant in epoch milliseconds; `None` means no deadline.
    pub due_epoch_ms: Option<i64>,
    /// `High|Medium|Low`.
    pub priority: String,
    pub is_overdue: bool,
}

/// Current projection plus the view state that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskViewResponse {
    pub items: Vec<TaskItem>,
    /// Incomplete tasks among `items`.
    pub remaining: u32,
    /// All tasks held by the store, ignoring filters.
    pub total: u32,
    pub search_text: String,
    pub category_filter: String,
    pub sort_option: String,
}

/// Generic action response envelope for task intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task_id: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id: task_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Opens (or reopens) the task store at `path`.
///
/// An empty `path` falls back to `TASKLIST_SNAPSHOT_PATH`, then to a file in
/// the temp directory.
///
/// # FFI contract
/// - Sync call; reads the snapshot file once.
/// - Replaces any previously opened store.
/// - Never panics; a missing or corrupt snapshot opens an empty store and
///   still returns `ok = true` with the loaded count in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_open(path: String) -> TaskActionResponse {
    let trimmed = path.trim();
    let resolved = if trimmed.is_empty() {
        default_snapshot_path()
    } else {
        PathBuf::from(trimmed)
    };
    let view_model = open_view_model(resolved);
    let count = view_model.store().len();
    *lock_tasks() = Some(view_model);
    TaskActionResponse::success(format!("Loaded {count} task(s)."), None)
}

/// Adds a task.
///
/// Input semantics:
/// - `category`: free-form; empty means `Personal`.
/// - `due_epoch_ms`: due instant in epoch milliseconds, `None` for no deadline.
/// - `priority`: `High|Medium|Low` (case-insensitive); empty means `Medium`.
///
/// # FFI contract
/// - Sync call; writes the snapshot file on success.
/// - Never panics.
/// - `ok = true` carries the new `task_id`.
/// - Blank or duplicate titles, unknown priorities and out-of-range dates
///   return `ok = false` and leave the store unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_add(
    title: String,
    category: String,
    due_epoch_ms: Option<i64>,
    priority: String,
) -> TaskActionResponse {
    let priority = if priority.trim().is_empty() {
        Priority::default()
    } else {
        match Priority::parse(&priority) {
            Some(priority) => priority,
            None => return TaskActionResponse::failure(format!("unknown priority `{priority}`")),
        }
    };
    let due_date = match due_epoch_ms {
        Some(ms) => match DateTime::<Utc>::from_timestamp_millis(ms) {
            Some(due) => Some(due),
            None => return TaskActionResponse::failure(format!("due date out of range: {ms}")),
        },
        None => None,
    };
    let category = if category.trim().is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category
    };

    let draft = NewTask::new(title)
        .category(category)
        .due_date(due_date)
        .priority(priority);
    match with_tasks(|tasks| tasks.add(draft)) {
        Some(id) => TaskActionResponse::success("Task added.", Some(id)),
        None => TaskActionResponse::failure("Task not added: title is empty or already used."),
    }
}

/// Toggles completion of one task.
///
/// # FFI contract
/// - Sync call; writes the snapshot file on success.
/// - Never panics.
/// - Malformed or unknown ids are a no-op with `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_toggle(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if with_tasks(|tasks| tasks.toggle_completion(id)) {
        TaskActionResponse::success("Task toggled.", Some(id))
    } else {
        TaskActionResponse::failure(format!("task not found: {id}"))
    }
}

/// Deletes one task, keeping the order of the rest.
///
/// # FFI contract
/// - Sync call; writes the snapshot file on success.
/// - Never panics.
/// - Malformed or unknown ids are a no-op with `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_delete(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if with_tasks(|tasks| tasks.delete(id)) {
        TaskActionResponse::success("Task deleted.", Some(id))
    } else {
        TaskActionResponse::failure(format!("task not found: {id}"))
    }
}

/// Sets the case-insensitive title search; empty clears it.
///
/// # FFI contract
/// - Sync call, in-memory only; nothing is persisted.
/// - Never panics; returns the recomputed projection.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_set_search_text(text: String) -> TaskViewResponse {
    with_tasks(|tasks| {
        tasks.set_search_text(text);
        view_response(tasks)
    })
}

/// Sets the category filter; `"All"` clears it.
///
/// # FFI contract
/// - Sync call, in-memory only; nothing is persisted.
/// - Never panics; returns the recomputed projection.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_set_category_filter(category: String) -> TaskViewResponse {
    with_tasks(|tasks| {
        tasks.set_category_filter(&category);
        view_response(tasks)
    })
}

/// Sets the sort option from a label (`Due Date|Priority|Title`).
///
/// # FFI contract
/// - Sync call, in-memory only; nothing is persisted.
/// - Never panics; unknown labels leave the current option unchanged.
/// - Returns the recomputed projection.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_set_sort_option(option: String) -> TaskViewResponse {
    with_tasks(|tasks| {
        match SortOption::parse(&option) {
            Some(sort) => tasks.set_sort_option(sort),
            None => warn!("event=sort_option module=ffi status=rejected reason=unknown_option"),
        }
        view_response(tasks)
    })
}

/// Returns the current projection.
///
/// # FFI contract
/// - Sync call, read-only.
/// - Opens the default snapshot on first use when `tasks_open` was not
///   called.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_view() -> TaskViewResponse {
    with_tasks(|tasks| view_response(tasks))
}

/// Category filter labels, `All` first.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; the list is never empty.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_categories() -> Vec<String> {
    filter_labels().into_iter().map(str::to_string).collect()
}

/// Sort option labels in picker order.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; the list is never empty.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_sort_options() -> Vec<String> {
    SortOption::ALL
        .iter()
        .map(|option| option.label().to_string())
        .collect()
}

fn with_tasks<T>(f: impl FnOnce(&mut FileViewModel) -> T) -> T {
    let mut guard = lock_tasks();
    let tasks = guard.get_or_insert_with(|| open_view_model(default_snapshot_path()));
    f(tasks)
}

fn lock_tasks() -> MutexGuard<'static, Option<FileViewModel>> {
    // A panicking listener must not brick every later call.
    TASKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_view_model(path: PathBuf) -> FileViewModel {
    info!("event=tasks_open module=ffi status=start");
    let store = TaskStore::open(JsonFileSnapshotRepository::new(path));
    TaskViewModel::new(store)
}

fn default_snapshot_path() -> PathBuf {
    if let Ok(raw) = std::env::var(SNAPSHOT_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_SNAPSHOT_FILE_NAME)
}

fn parse_task_id(raw: &str) -> Result<TaskId, TaskActionResponse> {
    TaskId::parse_str(raw.trim())
        .map_err(|_| TaskActionResponse::failure(format!("invalid task id `{raw}`")))
}

fn view_response(tasks: &FileViewModel) -> TaskViewResponse {
    let now = Utc::now();
    let projected = tasks.filtered_tasks();
    let remaining = remaining_count(&projected);
    let query = tasks.query();
    TaskViewResponse {
        items: projected
            .into_iter()
            .map(|task| to_task_item(task, now))
            .collect(),
        remaining: remaining as u32,
        total: tasks.store().len() as u32,
        search_text: query.search_text.clone(),
        category_filter: query.category.label().to_string(),
        sort_option: query.sort.label().to_string(),
    }
}

fn to_task_item(task: &Task, now: DateTime<Utc>) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        is_completed: task.is_completed,
        category: task.category.clone(),
        due_epoch_ms: task.due_date.map(|due| due.timestamp_millis()),
        priority: task.priority.label().to_string(),
        is_overdue: task.is_overdue(now),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, ping, tasks_add, tasks_categories, tasks_delete, tasks_open,
        tasks_set_category_filter, tasks_set_search_text, tasks_set_sort_option,
        tasks_sort_options, tasks_toggle, tasks_view,
    };
    use std::sync::Mutex;

    // Tests share the process-wide store.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn open_scratch_store() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let opened = tasks_open(path.to_str().unwrap().to_string());
        assert!(opened.ok, "{}", opened.message);
        tasks_set_search_text(String::new());
        tasks_set_category_filter("All".to_string());
        tasks_set_sort_option("Due Date".to_string());
        dir
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn init_logging_rejects_relative_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(error.contains("absolute"));
    }

    #[test]
    fn add_toggle_delete_flow_updates_remaining_count() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let _dir = open_scratch_store();

        let added = tasks_add(
            "Buy milk".to_string(),
            "Shopping".to_string(),
            None,
            String::new(),
        );
        assert!(added.ok, "{}", added.message);
        let id = added.task_id.unwrap();

        let view = tasks_view();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].priority, "Medium");
        assert_eq!(view.remaining, 1);

        assert!(tasks_toggle(id.clone()).ok);
        assert_eq!(tasks_view().remaining, 0);

        assert!(tasks_delete(id.clone()).ok);
        assert!(tasks_view().items.is_empty());
        assert!(!tasks_delete(id).ok);
    }

    #[test]
    fn duplicate_and_blank_titles_are_not_added() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let _dir = open_scratch_store();

        assert!(tasks_add("Call mom".into(), String::new(), None, String::new()).ok);
        assert!(!tasks_add(" Call mom ".into(), String::new(), None, String::new()).ok);
        assert!(!tasks_add("   ".into(), String::new(), None, String::new()).ok);

        let view = tasks_view();
        assert_eq!(view.total, 1);
        assert_eq!(view.items[0].category, "Personal");
    }

    #[test]
    fn invalid_inputs_return_failure_envelopes() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let _dir = open_scratch_store();

        assert!(!tasks_toggle("not-a-uuid".to_string()).ok);
        let bad_priority = tasks_add("x".into(), String::new(), None, "urgent".into());
        assert!(!bad_priority.ok);
        assert!(bad_priority.message.contains("priority"));
        assert_eq!(tasks_view().total, 0);
    }

    #[test]
    fn view_state_filters_and_sorts() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let _dir = open_scratch_store();

        tasks_add("Pay rent".into(), "Finance".into(), None, "High".into());
        tasks_add("Gym".into(), "Health".into(), Some(1_700_000_000_000), "Low".into());
        tasks_add("Budget review".into(), "Finance".into(), None, "Low".into());

        let view = tasks_set_category_filter("Finance".to_string());
        assert_eq!(view.category_filter, "Finance");
        assert_eq!(view.items.len(), 2);

        let view = tasks_set_sort_option("title".to_string());
        assert_eq!(view.sort_option, "Title");
        assert_eq!(view.items[0].title, "Budget review");

        let view = tasks_set_search_text("RENT".to_string());
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].title, "Pay rent");

        tasks_set_search_text(String::new());
        let view = tasks_set_category_filter("All".to_string());
        let gym = view.items.iter().find(|item| item.title == "Gym").unwrap();
        assert_eq!(gym.due_epoch_ms, Some(1_700_000_000_000));
        assert!(gym.is_overdue);
    }

    #[test]
    fn picker_labels_are_exposed() {
        assert_eq!(tasks_categories()[0], "All");
        assert_eq!(tasks_sort_options(), vec!["Due Date", "Priority", "Title"]);
    }
}
