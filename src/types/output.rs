//! Output structures for delivered announcements

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::types::{Announcement, Category};

/// One announcement as handed to the sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveredLine {
    /// When the drain loop delivered it
    pub timestamp: DateTime<Utc>,
    /// Originating context
    pub category: Category,
    /// Spoken text
    pub text: String,
    /// Position in delivery order, starting at 1
    pub sequence: u64,
}

impl DeliveredLine {
    pub fn new(announcement: &Announcement, sequence: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            category: announcement.category(),
            text: announcement.text().to_string(),
            sequence,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let tag = format!("[{}]", self.category.label());
        format!(
            "{} {} {}",
            self.timestamp.format("%H:%M:%S%.3f").to_string().dimmed(),
            paint(&tag, self.category),
            self.text
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "seq={} | category={} | text={}",
            self.sequence, self.category, self.text
        )
    }
}

fn paint(s: &str, category: Category) -> ColoredString {
    match category {
        Category::Dialogue => s.cyan(),
        Category::Menu => s.yellow(),
        Category::MenuChoice => s.bright_yellow(),
        Category::Investigation => s.green(),
        Category::SystemMessage => s.bright_black(),
    }
}
