//! Task store: the sole owner of the task sequence.
//!
//! # Responsibility
//! - Apply add/toggle/delete mutations to the in-memory sequence.
//! - Persist the full sequence after every successful mutation.
//! - Notify subscribed listeners synchronously after each mutation.
//!
//! # Invariants
//! - Task ids are unique within the store.
//! - Titles are unique (exact, case-sensitive) at creation time.
//! - Mutations never reorder surviving tasks.
//! - A failed save is logged and recorded but never rolls back memory.

use crate::model::task::{normalize_title, NewTask, Task, TaskId};
use crate::repo::snapshot_repo::{RepoError, TaskSnapshotRepository};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::time::Instant;

/// Mutation that triggered a listener notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Added(TaskId),
    Toggled(TaskId),
    Deleted(TaskId),
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreChange, &[Task]) + Send>;

/// In-memory task sequence with write-through snapshot persistence.
pub struct TaskStore<R: TaskSnapshotRepository> {
    repo: R,
    tasks: Vec<Task>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    last_save_error: Option<String>,
}

impl<R: TaskSnapshotRepository> TaskStore<R> {
    /// Creates a store and loads the persisted snapshot.
    ///
    /// A missing or unreadable snapshot yields an empty store; the failure
    /// is logged and never returned.
    pub fn open(repo: R) -> Self {
        let tasks = load_or_empty(&repo);
        Self {
            repo,
            tasks,
            listeners: Vec::new(),
            next_subscription: 0,
            last_save_error: None,
        }
    }

    /// Appends a new task.
    ///
    /// Returns `None` without touching state when the trimmed title is empty
    /// or already used by another task.
    pub fn add(&mut self, draft: NewTask) -> Option<TaskId> {
        let title = match normalize_title(&draft.title) {
            Ok(title) => title,
            Err(err) => {
                debug!("event=task_add module=store status=rejected reason={err}");
                return None;
            }
        };
        if self.tasks.iter().any(|task| task.title == title) {
            debug!("event=task_add module=store status=rejected reason=duplicate_title");
            return None;
        }

        let task = Task::from_new(title, draft);
        let id = task.id;
        self.tasks.push(task);
        info!(
            "event=task_add module=store status=ok task_id={id} count={}",
            self.tasks.len()
        );
        self.commit(StoreChange::Added(id));
        Some(id)
    }

    /// Flips completion of the task with `id`; `false` when it is absent.
    pub fn toggle_completion(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=skipped reason=not_found task_id={id}");
            return false;
        };
        task.is_completed = !task.is_completed;
        info!(
            "event=task_toggle module=store status=ok task_id={id} completed={}",
            task.is_completed
        );
        self.commit(StoreChange::Toggled(id));
        true
    }

    /// Removes the task with `id`, keeping the order of the rest.
    ///
    /// Returns `false` when no such task exists.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_delete module=store status=skipped reason=not_found task_id={id}");
            return false;
        };
        self.tasks.remove(index);
        info!(
            "event=task_delete module=store status=ok task_id={id} count={}",
            self.tasks.len()
        );
        self.commit(StoreChange::Deleted(id));
        true
    }

    /// Current tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Registers a listener called after every successful mutation.
    ///
    /// Listeners run synchronously in registration order, after the save
    /// attempt has finished.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange, &[Task]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; `false` when the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, change: StoreChange) {
        self.persist();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change, &self.tasks);
        }
    }

    fn persist(&mut self) {
        let started_at = Instant::now();
        match self.repo.save(&self.tasks) {
            Ok(()) => {
                debug!(
                    "event=snapshot_save module=store status=ok count={} duration_ms={}",
                    self.tasks.len(),
                    started_at.elapsed().as_millis()
                );
                self.last_save_error = None;
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.last_save_error = Some(err.to_string());
            }
        }
    }
}

fn load_or_empty<R: TaskSnapshotRepository>(repo: &R) -> Vec<Task> {
    match repo.load() {
        Ok(tasks) => {
            let tasks = dedupe_ids(tasks);
            info!(
                "event=snapshot_load module=store status=ok count={}",
                tasks.len()
            );
            tasks
        }
        Err(RepoError::NotFound(_)) => {
            info!("event=snapshot_load module=store status=empty reason=not_found");
            Vec::new()
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=store status=fallback error_code={} error={}",
                err.code(),
                err
            );
            Vec::new()
        }
    }
}

fn dedupe_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let total = tasks.len();
    let unique: Vec<Task> = tasks.into_iter().filter(|task| seen.insert(task.id)).collect();
    if unique.len() != total {
        warn!(
            "event=snapshot_load module=store status=repaired dropped_duplicates={}",
            total - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{StoreChange, TaskStore};
    use crate::model::task::{NewTask, Task};
    use crate::repo::snapshot_repo::{RepoError, RepoResult, TaskSnapshotRepository};
    use std::sync::{Arc, Mutex};

    /// Repository whose saves always fail.
    struct FailingRepo;

    impl TaskSnapshotRepository for FailingRepo {
        fn load(&self) -> RepoResult<Vec<Task>> {
            Err(RepoError::NotFound("nowhere".to_string()))
        }

        fn save(&self, _tasks: &[Task]) -> RepoResult<()> {
            Err(RepoError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn failed_save_keeps_mutation_and_records_error() {
        let mut store = TaskStore::open(FailingRepo);
        let id = store.add(NewTask::new("write report")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().title, "write report");
        assert!(store.last_save_error().unwrap().contains("disk full"));
    }

    #[test]
    fn listeners_run_in_order_and_can_unsubscribe() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = TaskStore::open(FailingRepo);

        let first = Arc::clone(&seen);
        let first_id = store.subscribe(move |change, tasks| {
            first.lock().unwrap().push(("first", *change, tasks.len()));
        });
        let second = Arc::clone(&seen);
        store.subscribe(move |change, tasks| {
            second.lock().unwrap().push(("second", *change, tasks.len()));
        });

        let id = store.add(NewTask::new("a")).unwrap();
        assert!(store.unsubscribe(first_id));
        assert!(!store.unsubscribe(first_id));
        store.delete(id);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("first", StoreChange::Added(id), 1),
                ("second", StoreChange::Added(id), 1),
                ("second", StoreChange::Deleted(id), 0),
            ]
        );
    }

    #[test]
    fn rejected_mutations_do_not_notify() {
        let calls = Arc::new(Mutex::new(0));
        let mut store = TaskStore::open(FailingRepo);
        let counter = Arc::clone(&calls);
        store.subscribe(move |_, _| *counter.lock().unwrap() += 1);

        store.add(NewTask::new("  "));
        store.toggle_completion(uuid::Uuid::new_v4());
        store.delete(uuid::Uuid::new_v4());

        assert_eq!(*calls.lock().unwrap(), 0);
    }
}
