//! Localization: every user-facing line comes from a keyed string table
//!
//! Templates use positional placeholders `{0}`, `{1}`, ...
//! Plural keys follow CLDR one/other: `<key>.one` when count == 1, else `<key>.other`,
//! with the count as `{0}` and extra arguments after it.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::{NarratorError, Result};

lazy_static! {
    static ref RE_PLACEHOLDER: Regex = Regex::new(r"\{(\d+)\}").unwrap();
}

/// Source of localized text
pub trait Localizer: Send + Sync {
    /// Raw template for `key`, if the table has one
    fn template(&self, key: &str) -> Option<&str>;

    fn get(&self, key: &str) -> String {
        self.format(key, &[])
    }

    fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        match self.template(key) {
            Some(template) => substitute(template, args),
            None => {
                warn!(key, "missing localized string");
                key.to_string()
            }
        }
    }

    fn plural(&self, key: &str, count: usize, extra: &[&dyn Display]) -> String {
        let form = if count == 1 { "one" } else { "other" };
        let mut args: Vec<&dyn Display> = Vec::with_capacity(extra.len() + 1);
        args.push(&count);
        args.extend_from_slice(extra);
        self.format(&format!("{}.{}", key, form), &args)
    }
}

/// Replace `{n}` with `args[n]`; placeholders without an argument are left as written
pub fn substitute(template: &str, args: &[&dyn Display]) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// In-memory key → template table
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in English table
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Parse a flat JSON object of key → template
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Overlay entries from a JSON file on top of this table
    pub fn overlay_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let overlay = Self::from_json_str(&json).map_err(|e| {
            NarratorError::Strings(format!("{}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), entries = overlay.len(), "loaded string overlay");
        self.entries.extend(overlay.entries);
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for StringTable {
    fn template(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

// =============================================================================
// ENGLISH TABLE
// =============================================================================

const ENGLISH: &[(&str, &str)] = &[
    // Dialogue
    ("dialogue.line", "{0}: {1}"),
    // Detective menu
    ("menu.detective", "Menu: {0} ({1} of {2})"),
    ("menu.option.examine", "Examine"),
    ("menu.option.move", "Move"),
    ("menu.option.talk", "Talk"),
    ("menu.option.present", "Present"),
    ("menu.unknown", "Unknown"),
    // Selection lists
    ("menu.kind.choice", "Choice"),
    ("menu.kind.talk", "Talk"),
    ("menu.selection.one", "{1} menu: {0} option. {2}"),
    ("menu.selection.other", "{1} menu: {0} options. {2}"),
    // Move menu
    ("menu.move", "Move: {0} ({1} of {2})"),
    ("menu.location_fallback", "Location {0}"),
    // Save / load
    ("menu.save_opened", "Save menu opened"),
    ("menu.load_opened", "Load menu opened"),
    ("menu.slot", "Slot {0}"),
    ("menu.slot_labeled", "Slot {0}: {1}"),
    // Options
    ("menu.options", "Options: {0}"),
    ("options.save_load", "Save/Load"),
    ("options.sound", "Sound"),
    ("options.game", "Game"),
    ("options.language", "Language"),
    ("options.display", "Display"),
    ("options.key_config", "Key Config"),
    ("options.story", "Story"),
    ("options.credits", "Credits"),
    ("options.privacy", "Privacy"),
    // Investigation
    ("investigation.point_of_interest", "Point of interest"),
    ("investigation.examined", "Already examined"),
    // Luminol
    ("luminol.hit_more_needed.one", "Hit! {0} more spray needed"),
    ("luminol.hit_more_needed.other", "Hit! {0} more sprays needed"),
    ("luminol.blood_found", "Blood found!"),
    // Music player
    ("music.player", "Music player"),
    ("music.track", "Track {0}: {1}"),
    ("music.playing", "Playing"),
    ("music.stopped", "Stopped"),
    ("music.mode", "Mode: {0}"),
    // Vase puzzle
    ("vase.not_active", "Not in vase puzzle"),
    ("vase.state_unreadable", "Unable to read puzzle state"),
    ("vase.pieces_unreadable", "Unable to read pieces"),
    (
        "vase.start",
        "Vase puzzle. Use Left/Right to select pieces, Q/R to rotate. Press H for hint, E to combine.",
    ),
    (
        "vase.start_final",
        "Vase puzzle, final piece. Use Q/R to rotate. Press H for hint, E to combine.",
    ),
    ("vase.complete", "Puzzle complete!"),
    ("vase.pieces_remaining.one", "{0} piece remaining."),
    ("vase.pieces_remaining.other", "{0} pieces remaining."),
    ("vase.correct_piece", "Correct piece selected."),
    ("vase.ready", "Rotation correct. Press E to combine."),
    ("vase.rotate_clockwise.one", "Press R {0} time to rotate."),
    ("vase.rotate_clockwise.other", "Press R {0} times to rotate."),
    ("vase.rotate_counter_clockwise.one", "Press Q {0} time to rotate."),
    ("vase.rotate_counter_clockwise.other", "Press Q {0} times to rotate."),
    ("vase.select_piece", "Select piece {0}."),
    ("vase.navigate_right", "Press Right to navigate."),
    ("vase.navigate_left", "Press Left to navigate."),
    ("vase.piece_placed", "Piece {0} (already placed)."),
    ("vase.piece_rotated", "Piece {0}, rotated {1} degrees."),
    // Video tape
    ("tape.not_active", "Not in video tape mode"),
    ("tape.pause_first", "Pause the video first with Backspace"),
    (
        "tape.start",
        "Video tape examination. Backspace to play/pause, Enter to fast forward, J to rewind, E to present. Press H for hint.",
    ),
    ("tape.playing", "Playing"),
    ("tape.paused", "Paused at frame {0}"),
    ("tape.paused_targets.one", "Paused at frame {1}, {0} target"),
    ("tape.paused_targets.other", "Paused at frame {1}, {0} targets"),
    ("tape.target_available", "Target available! Pause with Backspace."),
    ("tape.state_playing", "Playing, frame {0}."),
    ("tape.state_paused", "Paused, frame {0}."),
    ("tape.targets_available.one", "{0} target available"),
    ("tape.targets_available.other", "{0} targets available"),
    ("tape.no_targets", "No targets"),
    ("tape.cursor_on_target", "cursor on target {0}"),
    ("tape.no_targets_at_frame", "No targets available at this frame"),
    ("tape.target_present", "Target {0} of {1}. Press E to present."),
    (
        "tape.target_adjust",
        "Target {0} of {1}. Cursor positioned but may need adjustment. Use arrow keys to fine-tune, then E to present.",
    ),
    (
        "tape.hint.0",
        "First viewing: Find Goodman's locker lit up (open). Pause when you hear target available, press ] to select it, then E to present. Current frame: {0}.",
    ),
    (
        "tape.hint.1",
        "Second viewing: Something falls from the locker. A wrong target appears around frame 460. The correct falling object is around frame 490. Fast forward with Enter past 460, pause with Backspace around 490, press ] to cycle through targets until you find the falling object, then E to present. Current frame: {0}.",
    ),
    (
        "tape.hint.2",
        "Third viewing: The correct target is around frame 1360. Fast forward with Enter, pause with Backspace around 1360, press ] to select the target, then E to present. Current frame: {0}.",
    ),
    (
        "tape.hint.3",
        "Fourth viewing: The correct target is around frame 900. Fast forward with Enter, pause with Backspace around 900, press ] to select the target, then E to present. Current frame: {0}.",
    ),
    (
        "tape.hint.default",
        "Pause when you hear target available, press ] to select it, then E to present. Current frame: {0}.",
    ),
];
