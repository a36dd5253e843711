//! Task categories and the category filter.
//!
//! Categories are free-form labels. The suggested set is what the UI offers
//! in its pickers; the store never enforces it.

/// Category assigned when the caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "Personal";

/// Filter label that disables category filtering.
pub const ALL_CATEGORIES_LABEL: &str = "All";

/// Categories offered by the task input picker.
pub const SUGGESTED_CATEGORIES: [&str; 10] = [
    "Work", "Personal", "Shopping", "Health", "Home", "Finance", "Study", "Travel", "Hobbies",
    "Events",
];

/// Filter labels in display order: `All` followed by the suggested set.
pub fn filter_labels() -> Vec<&'static str> {
    std::iter::once(ALL_CATEGORIES_LABEL)
        .chain(SUGGESTED_CATEGORIES)
        .collect()
}

/// Category restriction applied by projections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Keep tasks whose category equals this label exactly.
    Only(String),
}

impl CategoryFilter {
    /// Maps a UI label to a filter; `"All"` disables filtering.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES_LABEL {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES_LABEL,
            Self::Only(category) => category.as_str(),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == category,
        }
    }
}
