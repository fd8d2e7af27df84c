//! Announcement and category definitions

use serde::{Deserialize, Serialize};

/// Which UI context produced a line of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Dialogue box text (speaker line)
    Dialogue,
    /// Menu items, menu headers, save/load slots
    Menu,
    /// Choice/talk selection list entries
    MenuChoice,
    /// Investigation, puzzle and minigame feedback
    Investigation,
    /// Status and "not available" responses
    SystemMessage,
}

/// What a category's text is compared against before enqueueing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupScope {
    /// Last text enqueued in the same category
    PerCategory,
    /// Last text enqueued in any category
    Global,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Dialogue,
        Category::Menu,
        Category::MenuChoice,
        Category::Investigation,
        Category::SystemMessage,
    ];

    /// Dedup scope for this category
    pub fn dedup_scope(&self) -> DedupScope {
        match self {
            Category::SystemMessage => DedupScope::Global,
            _ => DedupScope::PerCategory,
        }
    }

    /// Short label for logs and plain output
    pub fn label(&self) -> &'static str {
        match self {
            Category::Dialogue => "dialogue",
            Category::Menu => "menu",
            Category::MenuChoice => "choice",
            Category::Investigation => "investigation",
            Category::SystemMessage => "system",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A categorized line of text bound for the delivery sink
///
/// Immutable once built; consumed exactly once by the drain loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    text: String,
    category: Category,
}

impl Announcement {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
