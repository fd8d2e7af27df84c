//! Announcement routing
//!
//! Each UI context calls its own entry point. The router composes the spoken line for
//! that context, decides whether the context actually changed, and hands the result to
//! the queue under the context's category.

use std::sync::Arc;

use tracing::debug;

use crate::core::detector::{TextCombiner, ValueChange};
use crate::core::queue::QueueHandle;
use crate::core::strings::Localizer;
use crate::types::{
    BloodstainState, Category, DetectiveMenuKind, MusicPlayerSnapshot, OptionsCategory,
    SaveLoadKind, SelectionKind,
};
use crate::{SPRITE_EXAMINED, SPRITE_UNEXAMINED};

/// Per-context composition and change tracking in front of the queue
pub struct AnnouncementRouter {
    queue: QueueHandle,
    strings: Arc<dyn Localizer>,
    dialogue: TextCombiner,
    last_speaker: Option<String>,
    detective: Option<DetectiveMenuKind>,
    detective_cursor: ValueChange<usize>,
    selection: Vec<String>,
    selection_cursor: ValueChange<usize>,
    investigation_sprite: ValueChange<i32>,
    save_slot: ValueChange<usize>,
    options_category: ValueChange<OptionsCategory>,
}

impl AnnouncementRouter {
    pub fn new(queue: QueueHandle, strings: Arc<dyn Localizer>) -> Self {
        Self {
            queue,
            strings,
            dialogue: TextCombiner::new(),
            last_speaker: None,
            detective: None,
            detective_cursor: ValueChange::new(),
            selection: Vec::new(),
            selection_cursor: ValueChange::new(),
            investigation_sprite: ValueChange::new(),
            save_slot: ValueChange::new(),
            options_category: ValueChange::new(),
        }
    }

    pub fn queue(&self) -> &QueueHandle {
        &self.queue
    }

    pub fn strings(&self) -> &dyn Localizer {
        self.strings.as_ref()
    }

    /// Enqueue already-composed text
    pub fn announce(&self, text: impl Into<String>, category: Category) -> bool {
        self.queue.enqueue(text, category)
    }

    /// Answer an explicit user request; a repeated request is spoken again
    pub fn respond(&self, text: impl Into<String>, category: Category) -> bool {
        self.queue.reset(category);
        self.queue.enqueue(text, category)
    }

    pub fn system(&self, text: impl Into<String>) -> bool {
        self.announce(text, Category::SystemMessage)
    }

    // -------------------------------------------------------------------------
    // Dialogue
    // -------------------------------------------------------------------------

    /// One poll of the message box
    pub fn dialogue<S: AsRef<str>>(&mut self, speaker: Option<&str>, fragments: &[S]) -> bool {
        let Some(text) = self.dialogue.observe(fragments) else {
            return false;
        };

        let speaker = speaker.map(str::trim).filter(|s| !s.is_empty());
        let line = match speaker {
            Some(name) if self.last_speaker.as_deref() != Some(name) => {
                self.last_speaker = Some(name.to_string());
                self.strings.format("dialogue.line", &[&name, &text])
            }
            _ => text,
        };
        self.announce(line, Category::Dialogue)
    }

    /// Message box closed
    pub fn dialogue_closed(&mut self) {
        self.dialogue.reset();
        self.last_speaker = None;
        self.queue.reset(Category::Dialogue);
    }

    // -------------------------------------------------------------------------
    // Menus
    // -------------------------------------------------------------------------

    pub fn detective_menu_opened(&mut self, kind: DetectiveMenuKind, cursor: usize) -> bool {
        self.detective = Some(kind);
        self.detective_cursor.reset();
        self.detective_cursor.observe(cursor);

        let option = self.strings.get(kind.option_key(cursor));
        let text = self.strings.format(
            "menu.detective",
            &[&option, &cursor.saturating_add(1), &kind.option_count()],
        );
        self.announce(text, Category::Menu)
    }

    pub fn detective_menu_cursor(&mut self, cursor: usize) -> bool {
        let Some(kind) = self.detective else {
            return false;
        };
        if !self.detective_cursor.observe(cursor) {
            return false;
        }
        let option = self.strings.get(kind.option_key(cursor));
        self.announce(option, Category::Menu)
    }

    pub fn menu_closed(&mut self) {
        self.detective = None;
        self.detective_cursor.reset();
        self.queue.reset(Category::Menu);
    }

    /// Choice or talk list appeared; blank entries past the first end the list
    pub fn selection_opened<S: AsRef<str>>(
        &mut self,
        kind: SelectionKind,
        options: &[S],
        cursor: usize,
    ) -> bool {
        self.selection = options
            .iter()
            .map(|o| o.as_ref().trim())
            .take_while(|o| !o.is_empty())
            .map(String::from)
            .collect();
        self.selection_cursor.reset();
        self.selection_cursor.observe(cursor);

        if self.selection.is_empty() {
            return false;
        }
        let current = self.selection_option(cursor);
        let label = self.strings.get(kind.label_key());
        let text = self
            .strings
            .plural("menu.selection", self.selection.len(), &[&label, &current]);
        self.announce(text, Category::MenuChoice)
    }

    pub fn selection_cursor(&mut self, cursor: usize) -> bool {
        if self.selection.is_empty() || !self.selection_cursor.observe(cursor) {
            return false;
        }
        let Some(option) = self.selection.get(cursor).cloned() else {
            return false;
        };
        self.announce(option, Category::MenuChoice)
    }

    pub fn selection_closed(&mut self) {
        self.selection.clear();
        self.selection_cursor.reset();
        self.queue.reset(Category::MenuChoice);
    }

    fn selection_option(&self, cursor: usize) -> String {
        self.selection
            .get(cursor)
            .cloned()
            .unwrap_or_else(|| self.strings.get("menu.unknown"))
    }

    /// Travel destinations; `locations` may be shorter than `count` when names are missing
    pub fn move_menu<S: AsRef<str>>(&mut self, locations: &[S], cursor: usize) -> bool {
        let count = locations.len();
        if count == 0 {
            return false;
        }
        let name = locations
            .get(cursor)
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .map(String::from)
            .unwrap_or_else(|| self.strings.format("menu.location_fallback", &[&cursor.saturating_add(1)]));
        let text = self
            .strings
            .format("menu.move", &[&name, &cursor.saturating_add(1), &count]);
        self.announce(text, Category::Menu)
    }

    pub fn save_load_opened(&mut self, kind: SaveLoadKind) -> bool {
        self.save_slot.reset();
        let key = match kind {
            SaveLoadKind::Save => "menu.save_opened",
            SaveLoadKind::Load => "menu.load_opened",
        };
        self.respond(self.strings.get(key), Category::Menu)
    }

    pub fn save_load_cursor(&mut self, slot: usize, label: Option<&str>) -> bool {
        if !self.save_slot.observe(slot) {
            return false;
        }
        let number = slot.saturating_add(1);
        let text = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => self.strings.format("menu.slot_labeled", &[&number, &label]),
            None => self.strings.format("menu.slot", &[&number]),
        };
        self.announce(text, Category::Menu)
    }

    pub fn options_category(&mut self, category: OptionsCategory) -> bool {
        if !self.options_category.observe(category) {
            return false;
        }
        let name = self.strings.get(category.name_key());
        let text = self.strings.format("menu.options", &[&name]);
        self.announce(text, Category::Menu)
    }

    pub fn options_closed(&mut self) {
        self.options_category.reset();
        self.queue.reset(Category::Menu);
    }

    // -------------------------------------------------------------------------
    // Investigation
    // -------------------------------------------------------------------------

    /// Cursor sprite under the investigation cursor changed
    pub fn investigation_cursor(&mut self, sprite: i32) -> bool {
        if !self.investigation_sprite.observe(sprite) {
            return false;
        }
        let key = match sprite {
            SPRITE_UNEXAMINED => "investigation.point_of_interest",
            SPRITE_EXAMINED => "investigation.examined",
            _ => return false,
        };
        self.announce(self.strings.get(key), Category::Investigation)
    }

    pub fn investigation_ended(&mut self) {
        self.investigation_sprite.reset();
        self.queue.reset(Category::Investigation);
    }

    /// Luminol spray landed on a bloodstain
    pub fn luminol_hit(&self, state: BloodstainState, sprays_remaining: usize) -> bool {
        let text = match state {
            BloodstainState::Undiscovered if sprays_remaining > 0 => {
                self.strings
                    .plural("luminol.hit_more_needed", sprays_remaining, &[])
            }
            BloodstainState::Discovery => self.strings.get("luminol.blood_found"),
            _ => return false,
        };
        self.announce(text, Category::Investigation)
    }

    // -------------------------------------------------------------------------
    // Music player
    // -------------------------------------------------------------------------

    pub fn describe_music(&self, snapshot: Option<&MusicPlayerSnapshot>) -> String {
        let mut parts = vec![self.strings.get("music.player")];
        if let Some(music) = snapshot {
            if let Some(album) = music.album_name.as_deref().filter(|a| !a.is_empty()) {
                parts.push(album.to_string());
            }
            if let Some(title) = music.song_title.as_deref().filter(|t| !t.is_empty()) {
                let number = music.song_index.map_or(1, |i| i.saturating_add(1));
                parts.push(self.strings.format("music.track", &[&number, &title]));
            }
            parts.push(self.strings.get(if music.playing {
                "music.playing"
            } else {
                "music.stopped"
            }));
            if let Some(mode) = music.play_mode.as_deref().filter(|m| !m.is_empty()) {
                parts.push(self.strings.format("music.mode", &[&mode]));
            }
        }
        parts.join(". ")
    }

    /// Read the music player state on request
    pub fn music_state(&self, snapshot: Option<&MusicPlayerSnapshot>) -> bool {
        let text = self.describe_music(snapshot);
        debug!(%text, "music player state requested");
        self.respond(text, Category::Menu)
    }

    /// Forget every context, e.g. on scene change
    pub fn reset_all(&mut self) {
        self.dialogue.reset();
        self.last_speaker = None;
        self.detective = None;
        self.detective_cursor.reset();
        self.selection.clear();
        self.selection_cursor.reset();
        self.investigation_sprite.reset();
        self.save_slot.reset();
        self.options_category.reset();
        self.queue.reset_all();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::strings::StringTable;
    use pretty_assertions::assert_eq;

    fn router() -> AnnouncementRouter {
        AnnouncementRouter::new(QueueHandle::new(), Arc::new(StringTable::english()))
    }

    fn drain(router: &AnnouncementRouter) -> Vec<String> {
        std::iter::from_fn(|| router.queue().dequeue())
            .map(|a| a.into_text())
            .collect()
    }

    #[test]
    fn test_dialogue_fragments() {
        let mut router = router();
        assert!(router.dialogue(None, &["Hello", "", "there"]));
        assert!(!router.dialogue(None, &["Hello", "", "there"]));
        assert!(router.dialogue(None, &["Hello", "there", "friend"]));
        assert_eq!(drain(&router), vec!["Hello there", "Hello there friend"]);
    }

    #[test]
    fn test_speaker_prefixed_on_change_only() {
        let mut router = router();
        router.dialogue(Some("Phoenix"), &["Hold it!"]);
        router.dialogue(Some("Phoenix"), &["That's a contradiction."]);
        router.dialogue(Some("Edgeworth"), &["Objection!"]);
        assert_eq!(
            drain(&router),
            vec![
                "Phoenix: Hold it!",
                "That's a contradiction.",
                "Edgeworth: Objection!"
            ]
        );
    }

    #[test]
    fn test_dialogue_closed_allows_repeat() {
        let mut router = router();
        router.dialogue(Some("Maya"), &["Nick!"]);
        router.dialogue_closed();
        router.dialogue(Some("Maya"), &["Nick!"]);
        assert_eq!(drain(&router), vec!["Maya: Nick!", "Maya: Nick!"]);
    }

    #[test]
    fn test_detective_menu() {
        let mut router = router();
        router.detective_menu_opened(DetectiveMenuKind::Full, 0);
        assert!(!router.detective_menu_cursor(0));
        router.detective_menu_cursor(2);
        router.detective_menu_cursor(3);
        assert_eq!(
            drain(&router),
            vec!["Menu: Examine (1 of 4)", "Talk", "Present"]
        );
    }

    #[test]
    fn test_detective_menu_basic_out_of_range() {
        let mut router = router();
        router.detective_menu_opened(DetectiveMenuKind::Basic, 1);
        router.detective_menu_cursor(3);
        assert_eq!(drain(&router), vec!["Menu: Move (2 of 2)", "Unknown"]);
    }

    #[test]
    fn test_selection_list() {
        let mut router = router();
        router.selection_opened(SelectionKind::Talk, &["Yes", "No", "", "stale"], 1);
        router.selection_cursor(0);
        router.selection_cursor(0);
        router.selection_cursor(5);
        assert_eq!(drain(&router), vec!["Talk menu: 2 options. No", "Yes"]);
    }

    #[test]
    fn test_selection_single_option() {
        let mut router = router();
        router.selection_opened(SelectionKind::Choice, &["Continue"], 0);
        assert_eq!(drain(&router), vec!["Choice menu: 1 option. Continue"]);
    }

    #[test]
    fn test_investigation_cursor_value_change() {
        let mut router = router();
        router.investigation_cursor(0);
        router.investigation_cursor(SPRITE_UNEXAMINED);
        router.investigation_cursor(SPRITE_UNEXAMINED);
        router.investigation_cursor(0);
        router.investigation_cursor(SPRITE_EXAMINED);
        assert_eq!(drain(&router), vec!["Point of interest", "Already examined"]);
    }

    #[test]
    fn test_move_menu_fallback_name() {
        let mut router = router();
        router.move_menu(&["Detention Center", ""], 1);
        assert_eq!(drain(&router), vec!["Move: Location 2 (2 of 2)"]);
    }

    #[test]
    fn test_save_slots() {
        let mut router = router();
        router.save_load_opened(SaveLoadKind::Load);
        router.save_load_cursor(0, Some("Episode 1"));
        router.save_load_cursor(0, Some("Episode 1"));
        router.save_load_cursor(1, None);
        assert_eq!(
            drain(&router),
            vec!["Load menu opened", "Slot 1: Episode 1", "Slot 2"]
        );
    }

    #[test]
    fn test_options_category() {
        let mut router = router();
        router.options_category(OptionsCategory::Sound);
        router.options_category(OptionsCategory::Sound);
        router.options_category(OptionsCategory::KeyConfig);
        assert_eq!(drain(&router), vec!["Options: Sound", "Options: Key Config"]);
    }

    #[test]
    fn test_luminol() {
        let router = router();
        router.luminol_hit(BloodstainState::Undiscovered, 2);
        router.luminol_hit(BloodstainState::Undiscovered, 0);
        router.luminol_hit(BloodstainState::Discovery, 0);
        router.luminol_hit(BloodstainState::Discovered, 0);
        assert_eq!(
            drain(&router),
            vec!["Hit! 2 more sprays needed", "Blood found!"]
        );
    }

    #[test]
    fn test_music_state() {
        let router = router();
        let music = MusicPlayerSnapshot {
            album_name: Some("Trilogy".into()),
            song_title: Some("Cornered".into()),
            song_index: Some(4),
            playing: true,
            play_mode: Some("Repeat".into()),
        };
        assert_eq!(
            router.describe_music(Some(&music)),
            "Music player. Trilogy. Track 5: Cornered. Playing. Mode: Repeat"
        );
        assert_eq!(router.describe_music(None), "Music player");
    }

    #[test]
    fn test_extreme_indices_still_announce() {
        let max = usize::MAX;
        let mut router = router();
        router.detective_menu_opened(DetectiveMenuKind::Basic, max);
        router.move_menu(&["Courtroom"], max);
        router.save_load_cursor(max, None);
        assert_eq!(
            drain(&router),
            vec![
                format!("Menu: Unknown ({} of 2)", max),
                format!("Move: Location {} ({} of 1)", max, max),
                format!("Slot {}", max),
            ]
        );

        let music = MusicPlayerSnapshot {
            song_title: Some("Cornered".into()),
            song_index: Some(max),
            ..MusicPlayerSnapshot::default()
        };
        assert!(router
            .describe_music(Some(&music))
            .contains(&format!("Track {}: Cornered", max)));
    }

    #[test]
    fn test_respond_repeats() {
        let router = router();
        assert!(router.respond("Puzzle complete!", Category::Investigation));
        assert!(router.respond("Puzzle complete!", Category::Investigation));
        assert_eq!(router.queue().len(), 2);
    }
}
