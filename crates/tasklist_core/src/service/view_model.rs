//! UI-facing view model over a task store.
//!
//! # Responsibility
//! - Hold transient search/category/sort state.
//! - Forward user intents to the owned `TaskStore`.
//! - Recompute the projection on demand; nothing here is persisted.

use crate::model::category::CategoryFilter;
use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::snapshot_repo::TaskSnapshotRepository;
use crate::service::projection::{project, remaining_count, ProjectionQuery, SortOption};
use crate::service::task_store::TaskStore;

/// Store plus the filter/sort state chosen by the user.
pub struct TaskViewModel<R: TaskSnapshotRepository> {
    store: TaskStore<R>,
    query: ProjectionQuery,
}

impl<R: TaskSnapshotRepository> TaskViewModel<R> {
    /// Wraps a store with default state: no search, all categories,
    /// sorted by due date.
    pub fn new(store: TaskStore<R>) -> Self {
        Self {
            store,
            query: ProjectionQuery::default(),
        }
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    pub fn query(&self) -> &ProjectionQuery {
        &self.query
    }

    /// Adds a task; an empty raw title never reaches the store.
    pub fn add(&mut self, draft: NewTask) -> Option<TaskId> {
        if draft.title.is_empty() {
            return None;
        }
        self.store.add(draft)
    }

    pub fn toggle_completion(&mut self, id: TaskId) -> bool {
        self.store.toggle_completion(id)
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        self.store.delete(id)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query.search_text = text.into();
    }

    /// Accepts a UI label; `"All"` clears the category filter.
    pub fn set_category_filter(&mut self, label: &str) {
        self.query.category = CategoryFilter::from_label(label);
    }

    pub fn set_sort_option(&mut self, sort: SortOption) {
        self.query.sort = sort;
    }

    /// Filtered and sorted view of the store's current tasks.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        project(self.store.tasks(), &self.query)
    }

    /// Incomplete tasks in the current projection.
    pub fn remaining_tasks(&self) -> usize {
        remaining_count(&self.filtered_tasks())
    }
}
