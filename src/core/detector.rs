//! Edge detection over polled state
//!
//! Monitors poll once per engine tick. These detectors turn the stream of samples into
//! the moments worth announcing:
//! - `ActiveEdge`: false→true / true→false
//! - `ValueChange`: value differs from the previous poll
//! - `TextCombiner`: assembled dialogue text differs from the last *announced* text

use tracing::trace;

/// Transition reported by an `ActiveEdge`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Flipped false→true this poll
    Entered,
    /// Flipped true→false this poll
    Exited,
    /// No change
    Steady,
}

/// Previous-poll flag for one boolean signal
#[derive(Debug, Default, Clone)]
pub struct ActiveEdge {
    was_active: bool,
}

impl ActiveEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this poll's flag and report the transition
    pub fn observe(&mut self, active: bool) -> Edge {
        let edge = match (self.was_active, active) {
            (false, true) => Edge::Entered,
            (true, false) => Edge::Exited,
            _ => Edge::Steady,
        };
        self.was_active = active;
        edge
    }

    pub fn is_active(&self) -> bool {
        self.was_active
    }

    pub fn reset(&mut self) {
        self.was_active = false;
    }
}

/// Previous-poll value for one scalar or identifier signal
///
/// The new value is stored immediately, so flickering A→B→A reports two changes.
#[derive(Debug, Clone)]
pub struct ValueChange<T> {
    last: Option<T>,
}

impl<T> Default for ValueChange<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq + Clone + std::fmt::Debug> ValueChange<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`; true when it differs from the previous poll (or is the first)
    pub fn observe(&mut self, value: T) -> bool {
        if self.last.as_ref() == Some(&value) {
            return false;
        }
        trace!(from = ?self.last, to = ?value, "value changed");
        self.last = Some(value);
        true
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Join non-blank fragments with single spaces
pub fn combine_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut combined = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.trim().is_empty() {
            continue;
        }
        if !combined.is_empty() {
            combined.push(' ');
        }
        combined.push_str(fragment);
    }
    combined
}

/// Dialogue text assembler
///
/// Compares against the last text it *released*, not the last text it saw, so a box
/// still typing out over many polls is announced once per distinct full line.
#[derive(Debug, Default, Clone)]
pub struct TextCombiner {
    last_announced: String,
}

impl TextCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine this poll's fragments; `Some(text)` when it is new and non-blank
    pub fn observe<I, S>(&mut self, fragments: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let combined = combine_fragments(fragments);
        if combined.trim().is_empty() || combined == self.last_announced {
            return None;
        }
        self.last_announced = combined.clone();
        Some(combined)
    }

    pub fn last_announced(&self) -> &str {
        &self.last_announced
    }

    pub fn reset(&mut self) {
        self.last_announced.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
