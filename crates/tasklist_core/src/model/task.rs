//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in snapshots.
//! - Normalize and validate user-provided titles.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is trimmed and non-empty.
//! - A missing due date is `None`, never a sentinel instant.

use crate::model::category::DEFAULT_CATEGORY;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every task held by a store.
pub type TaskId = Uuid;

/// Task urgency.
///
/// Ordering follows display priority: `High < Medium < Low`, so an
/// ascending sort lists the most urgent tasks first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities in sort order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Position in the ascending sort order.
    pub fn sort_index(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Wire/display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parses a label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task id must not be nil.
    NilId,
    /// Title is empty after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized with camelCase field names; `dueDate` is RFC 3339 or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub is_completed: bool,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

/// Unvalidated wire shape; converted into `Task` through `validate()`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    is_completed: bool,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    priority: Priority,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            title: record.title,
            is_completed: record.is_completed,
            category: record.category,
            due_date: record.due_date,
            priority: record.priority,
        };
        task.validate()?;
        Ok(task)
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    /// Builds a fresh, incomplete task with a generated id.
    ///
    /// Only the store calls this; callers go through `TaskStore::add`.
    pub(crate) fn from_new(title: String, draft: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            is_completed: false,
            category: draft.category,
            due_date: draft.due_date,
            priority: draft.priority,
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns whether the task is past due and still open at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.is_completed,
            None => false,
        }
    }
}

/// Add request carrying the caller-supplied attributes.
///
/// `Default` yields the store defaults: category `Personal`, no due date,
/// `Medium` priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            due_date: None,
            priority: Priority::Medium,
        }
    }
}

/// Trims surrounding whitespace and rejects empty titles.
pub fn normalize_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, Priority, TaskValidationError};

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  milk \t").unwrap(), "milk");
        assert_eq!(
            normalize_title(" \n ").unwrap_err(),
            TaskValidationError::EmptyTitle
        );
    }

    #[test]
    fn priority_order_matches_sort_index() {
        let mut sorted = vec![Priority::Low, Priority::High, Priority::Medium];
        sorted.sort();
        assert_eq!(sorted, Priority::ALL.to_vec());
        assert!(Priority::ALL
            .windows(2)
            .all(|pair| pair[0].sort_index() < pair[1].sort_index()));
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse(" low "), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }
}
