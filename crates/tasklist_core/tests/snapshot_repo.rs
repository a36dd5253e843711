use chrono::{TimeZone, Utc};
use tasklist_core::db::open_db;
use tasklist_core::{
    JsonFileSnapshotRepository, NewTask, Priority, RepoError, SqliteSnapshotRepository,
    TaskSnapshotRepository, TaskStore,
};

fn sample_tasks() -> Vec<tasklist_core::Task> {
    // Build through a store so ids are generated the normal way.
    let mut store = TaskStore::open(SqliteSnapshotRepository::open_in_memory().unwrap());
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
    store.add(NewTask::new("alpha").category("Work").priority(Priority::High));
    let id = store
        .add(NewTask::new("beta").due_date(Some(due)).priority(Priority::Low))
        .unwrap();
    store.add(NewTask::new("gamma").category("Travel"));
    store.toggle_completion(id);
    store.tasks().to_vec()
}

#[test]
fn file_save_then_load_round_trips_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileSnapshotRepository::in_dir(dir.path());
    let tasks = sample_tasks();

    repo.save(&tasks).unwrap();
    assert_eq!(repo.load().unwrap(), tasks);
}

#[test]
fn file_load_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileSnapshotRepository::in_dir(dir.path());

    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn file_load_malformed_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileSnapshotRepository::in_dir(dir.path());
    std::fs::write(repo.path(), "[{\"id\": 42}]").unwrap();

    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::Decode(_)), "unexpected error: {err}");
}

#[test]
fn file_save_replaces_content_and_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileSnapshotRepository::new(dir.path().join("nested/tasks.json"));
    let tasks = sample_tasks();

    repo.save(&tasks).unwrap();
    repo.save(&tasks[..1]).unwrap();

    assert_eq!(repo.load().unwrap(), tasks[..1].to_vec());
    let entries: Vec<String> = std::fs::read_dir(dir.path().join("nested"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["tasks.json".to_string()]);
}

#[test]
fn snapshot_uses_expected_wire_fields() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileSnapshotRepository::in_dir(dir.path());
    let tasks = sample_tasks();
    repo.save(&tasks).unwrap();

    let raw = std::fs::read_to_string(repo.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["title"], "alpha");
    assert_eq!(records[0]["priority"], "High");
    assert_eq!(records[0]["isCompleted"], false);
    assert!(records[0]["dueDate"].is_null());
    assert_eq!(records[1]["isCompleted"], true);
    assert_eq!(records[1]["dueDate"], "2025-06-01T09:30:00Z");
    assert_eq!(records[2]["category"], "Travel");
    assert_eq!(records[2]["id"], tasks[2].id.to_string());
}

#[test]
fn sqlite_load_missing_row_is_not_found() {
    let repo = SqliteSnapshotRepository::open_in_memory().unwrap();
    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn sqlite_save_overwrites_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let tasks = sample_tasks();
    {
        let repo = SqliteSnapshotRepository::open(&path).unwrap();
        repo.save(&tasks).unwrap();
        repo.save(&tasks[1..]).unwrap();
    }

    let reopened = SqliteSnapshotRepository::open(&path).unwrap();
    assert_eq!(reopened.load().unwrap(), tasks[1..].to_vec());

    let conn = open_db(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let tasks = sample_tasks();

    let work = SqliteSnapshotRepository::new(open_db(&path).unwrap(), "work");
    work.save(&tasks).unwrap();
    let home = SqliteSnapshotRepository::new(open_db(&path).unwrap(), "home");

    assert!(matches!(home.load().unwrap_err(), RepoError::NotFound(_)));
    assert_eq!(work.load().unwrap().len(), 3);
}
