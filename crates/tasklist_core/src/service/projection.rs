//! Filtered and sorted task projections.
//!
//! # Invariants
//! - Projections are pure functions of the task slice and the query.
//! - Sorting is stable: equal keys keep their filtered order.
//! - Tasks without a due date sort after every dated task.

use crate::model::category::CategoryFilter;
use crate::model::task::Task;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Sort key for projections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOption {
    #[default]
    DueDate,
    Priority,
    Title,
}

impl SortOption {
    /// All options in picker order.
    pub const ALL: [SortOption; 3] = [SortOption::DueDate, SortOption::Priority, SortOption::Title];

    pub fn label(self) -> &'static str {
        match self {
            Self::DueDate => "Due Date",
            Self::Priority => "Priority",
            Self::Title => "Title",
        }
    }

    /// Parses a display label or a snake_case name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "due date" | "due_date" | "duedate" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Transient view state a projection is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionQuery {
    /// Case-insensitive title substring; empty disables the filter.
    pub search_text: String,
    pub category: CategoryFilter,
    pub sort: SortOption,
}

/// Filters by category, then by search text, then stable-sorts.
pub fn project<'a>(tasks: &'a [Task], query: &ProjectionQuery) -> Vec<&'a Task> {
    let needle = query.search_text.to_lowercase();
    let mut projected: Vec<&Task> = tasks
        .iter()
        .filter(|task| query.category.matches(&task.category))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect();

    // `sort_by` is a stable merge sort.
    projected.sort_by(|left, right| compare(left, right, query.sort));
    projected
}

/// Number of incomplete tasks in a projection.
pub fn remaining_count(projected: &[&Task]) -> usize {
    projected.iter().filter(|task| !task.is_completed).count()
}

fn compare(left: &Task, right: &Task, sort: SortOption) -> Ordering {
    match sort {
        SortOption::DueDate => match (left.due_date, right.due_date) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortOption::Priority => left.priority.cmp(&right.priority),
        SortOption::Title => left.title.cmp(&right.title),
    }
}
