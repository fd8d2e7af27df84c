//! Announcement queue: FIFO buffer with dedup against the last enqueued text
//!
//! Dedup only looks at what was last *enqueued* for a category, never at what is still
//! pending, so two rapid identical enqueues collapse into one item.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::types::{Announcement, Category, DedupScope};

/// Last enqueued text per category plus one global last text
#[derive(Debug, Default, Clone)]
pub struct DedupState {
    per_category: HashMap<Category, String>,
    global_last: String,
}

impl DedupState {
    /// Would enqueueing `text` under `category` repeat the last announcement?
    pub fn is_repeat(&self, text: &str, category: Category) -> bool {
        match category.dedup_scope() {
            DedupScope::PerCategory => self
                .per_category
                .get(&category)
                .is_some_and(|last| last == text),
            DedupScope::Global => self.global_last == text,
        }
    }

    fn record(&mut self, text: &str, category: Category) {
        self.per_category.insert(category, text.to_string());
        self.global_last = text.to_string();
    }

    /// Forget the last text for one category
    pub fn reset(&mut self, category: Category) {
        match category.dedup_scope() {
            DedupScope::PerCategory => {
                self.per_category.remove(&category);
            }
            DedupScope::Global => {
                self.per_category.remove(&category);
                self.global_last.clear();
            }
        }
    }

    pub fn last(&self, category: Category) -> Option<&str> {
        self.per_category.get(&category).map(String::as_str)
    }
}

/// Ordered buffer of pending announcements
#[derive(Debug, Default)]
pub struct AnnouncementQueue {
    pending: VecDeque<Announcement>,
    dedup: DedupState,
    enqueued: u64,
    suppressed: u64,
}

impl AnnouncementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` unless it is blank or repeats the last text for `category`.
    /// Returns whether an item was queued.
    pub fn enqueue(&mut self, text: impl Into<String>, category: Category) -> bool {
        let text = text.into();
        if text.trim().is_empty() {
            return false;
        }
        if self.dedup.is_repeat(&text, category) {
            self.suppressed += 1;
            trace!(category = %category, text = %text, "suppressed repeat");
            return false;
        }

        self.dedup.record(&text, category);
        debug!(category = %category, text = %text, pending = self.pending.len() + 1, "enqueued");
        self.pending.push_back(Announcement::new(text, category));
        self.enqueued += 1;
        true
    }

    /// Pop the oldest pending announcement
    pub fn dequeue(&mut self) -> Option<Announcement> {
        self.pending.pop_front()
    }

    /// Clear dedup memory for a closed context so the same line may be announced again
    pub fn reset(&mut self, category: Category) {
        self.dedup.reset(category);
    }

    pub fn reset_all(&mut self) {
        self.dedup = DedupState::default();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn dedup(&self) -> &DedupState {
        &self.dedup
    }

    /// Items accepted since creation
    pub fn enqueued_count(&self) -> u64 {
        self.enqueued
    }

    /// Items rejected as repeats since creation
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }
}

#[derive(Debug, Default)]
struct Shared {
    queue: Mutex<AnnouncementQueue>,
    ready: Notify,
}

/// Cloneable handle shared by producers and the single drain loop
///
/// Producers and the consumer may live on different threads, so the queue sits behind
/// a mutex; every operation holds it only for O(1) work.
#[derive(Debug, Clone, Default)]
pub struct QueueHandle {
    shared: Arc<Shared>,
}

impl QueueHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AnnouncementQueue> {
        self.shared
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, text: impl Into<String>, category: Category) -> bool {
        let queued = self.lock().enqueue(text, category);
        if queued {
            self.shared.ready.notify_one();
        }
        queued
    }

    pub fn dequeue(&self) -> Option<Announcement> {
        self.lock().dequeue()
    }

    pub fn reset(&self, category: Category) {
        self.lock().reset(category);
    }

    pub fn reset_all(&self) {
        self.lock().reset_all();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn suppressed_count(&self) -> u64 {
        self.lock().suppressed_count()
    }

    /// Wait until something was enqueued since the last wake-up
    pub async fn ready(&self) {
        self.shared.ready.notified().await;
    }
}

// =============================================================================
// TESTS
// =============================================================================
