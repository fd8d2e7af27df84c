//! Scripted game sessions
//!
//! A script is JSON lines, one `ScriptEvent` per line. Each event is either a game
//! snapshot poll, a UI context change, a player request, or a pause. `Session` feeds
//! them to the router and monitors exactly as live hooks would.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::navigation::SimulatedCursor;
use crate::core::queue::QueueHandle;
use crate::core::router::AnnouncementRouter;
use crate::core::strings::Localizer;
use crate::core::tape::VideoTapeMonitor;
use crate::core::vase::VasePuzzleMonitor;
use crate::types::{
    BloodstainState, DetectiveMenuKind, MusicPlayerSnapshot, OptionsCategory, SaveLoadKind,
    SelectionKind, VasePuzzleSnapshot, VideoTapeSnapshot,
};
use crate::{NarratorError, Result};

/// Player-initiated query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRequest {
    VaseHint,
    VaseState,
    TapeState,
    TapeHint,
    NextTarget,
    PreviousTarget,
    MusicState,
}

/// One line of a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Dialogue {
        #[serde(default)]
        speaker: Option<String>,
        fragments: Vec<String>,
    },
    DialogueClosed,
    DetectiveMenu {
        kind: DetectiveMenuKind,
        #[serde(default)]
        cursor: usize,
    },
    DetectiveCursor {
        cursor: usize,
    },
    MenuClosed,
    Selection {
        kind: SelectionKind,
        options: Vec<String>,
        #[serde(default)]
        cursor: usize,
    },
    SelectionCursor {
        cursor: usize,
    },
    SelectionClosed,
    MoveMenu {
        locations: Vec<String>,
        #[serde(default)]
        cursor: usize,
    },
    SaveLoad {
        kind: SaveLoadKind,
    },
    SaveSlot {
        slot: usize,
        #[serde(default)]
        label: Option<String>,
    },
    Options {
        category: OptionsCategory,
    },
    OptionsClosed,
    InvestigationCursor {
        sprite: i32,
    },
    InvestigationEnded,
    Luminol {
        state: BloodstainState,
        #[serde(default)]
        remaining: usize,
    },
    /// Vase minigame poll; absent snapshot means the minigame object does not exist
    Vase {
        #[serde(default)]
        snapshot: Option<VasePuzzleSnapshot>,
    },
    VideoTape {
        #[serde(default)]
        snapshot: Option<VideoTapeSnapshot>,
    },
    Music {
        #[serde(default)]
        snapshot: Option<MusicPlayerSnapshot>,
    },
    Request {
        request: UserRequest,
    },
    System {
        text: String,
    },
    Wait {
        ms: u64,
    },
}

/// Parse one script line; blank lines and `#` comments yield `None`
pub fn parse_event(line_no: usize, line: &str) -> Result<Option<ScriptEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| NarratorError::Script {
            line: line_no,
            reason: e.to_string(),
        })
}

/// Parse a whole script
pub fn parse_script(script: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for (i, line) in script.lines().enumerate() {
        if let Some(event) = parse_event(i + 1, line)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Router, monitors and a simulated cursor driven by script events
pub struct Session {
    router: AnnouncementRouter,
    vase: VasePuzzleMonitor,
    tape: VideoTapeMonitor,
    cursor: SimulatedCursor,
    last_vase: Option<VasePuzzleSnapshot>,
    last_tape: Option<VideoTapeSnapshot>,
    last_music: Option<MusicPlayerSnapshot>,
}

impl Session {
    pub fn new(queue: QueueHandle, strings: Arc<dyn Localizer>) -> Self {
        Self::with_cursor(queue, strings, SimulatedCursor::default())
    }

    pub fn with_cursor(
        queue: QueueHandle,
        strings: Arc<dyn Localizer>,
        cursor: SimulatedCursor,
    ) -> Self {
        Self {
            router: AnnouncementRouter::new(queue, strings),
            vase: VasePuzzleMonitor::default(),
            tape: VideoTapeMonitor::default(),
            cursor,
            last_vase: None,
            last_tape: None,
            last_music: None,
        }
    }

    pub fn router(&self) -> &AnnouncementRouter {
        &self.router
    }

    pub fn cursor(&self) -> &SimulatedCursor {
        &self.cursor
    }

    /// Apply one event; returns how long to pause for `wait` events
    pub fn apply(&mut self, event: ScriptEvent) -> Option<Duration> {
        trace!(?event, "applying script event");
        match event {
            ScriptEvent::Dialogue { speaker, fragments } => {
                self.router.dialogue(speaker.as_deref(), &fragments);
            }
            ScriptEvent::DialogueClosed => self.router.dialogue_closed(),
            ScriptEvent::DetectiveMenu { kind, cursor } => {
                self.router.detective_menu_opened(kind, cursor);
            }
            ScriptEvent::DetectiveCursor { cursor } => {
                self.router.detective_menu_cursor(cursor);
            }
            ScriptEvent::MenuClosed => self.router.menu_closed(),
            ScriptEvent::Selection {
                kind,
                options,
                cursor,
            } => {
                self.router.selection_opened(kind, &options, cursor);
            }
            ScriptEvent::SelectionCursor { cursor } => {
                self.router.selection_cursor(cursor);
            }
            ScriptEvent::SelectionClosed => self.router.selection_closed(),
            ScriptEvent::MoveMenu { locations, cursor } => {
                self.router.move_menu(&locations, cursor);
            }
            ScriptEvent::SaveLoad { kind } => {
                self.router.save_load_opened(kind);
            }
            ScriptEvent::SaveSlot { slot, label } => {
                self.router.save_load_cursor(slot, label.as_deref());
            }
            ScriptEvent::Options { category } => {
                self.router.options_category(category);
            }
            ScriptEvent::OptionsClosed => self.router.options_closed(),
            ScriptEvent::InvestigationCursor { sprite } => {
                self.router.investigation_cursor(sprite);
            }
            ScriptEvent::InvestigationEnded => self.router.investigation_ended(),
            ScriptEvent::Luminol { state, remaining } => {
                self.router.luminol_hit(state, remaining);
            }
            ScriptEvent::Vase { snapshot } => {
                self.vase.poll(snapshot.as_ref(), &self.router);
                self.last_vase = snapshot;
            }
            ScriptEvent::VideoTape { snapshot } => {
                if let Some(tape) = snapshot.as_ref() {
                    self.cursor.set_targets(&tape.targets);
                }
                self.tape.poll(snapshot.as_ref(), &self.router);
                self.last_tape = snapshot;
            }
            ScriptEvent::Music { snapshot } => self.last_music = snapshot,
            ScriptEvent::Request { request } => self.request(request),
            ScriptEvent::System { text } => {
                self.router.system(text);
            }
            ScriptEvent::Wait { ms } => return Some(Duration::from_millis(ms)),
        }
        None
    }

    /// Answer a player request against the latest snapshots
    pub fn request(&mut self, request: UserRequest) {
        debug!(?request, "player request");
        match request {
            UserRequest::VaseHint => {
                self.vase.hint(self.last_vase.as_ref(), &self.router);
            }
            UserRequest::VaseState => {
                self.vase.state(self.last_vase.as_ref(), &self.router);
            }
            UserRequest::TapeState => {
                let tape = self.tape_with_cursor();
                self.tape.state(tape.as_ref(), &self.router);
            }
            UserRequest::TapeHint => {
                self.tape.hint(self.last_tape.as_ref(), &self.router);
            }
            UserRequest::NextTarget => {
                self.tape
                    .navigate_next(self.last_tape.as_ref(), &mut self.cursor, &self.router);
            }
            UserRequest::PreviousTarget => {
                self.tape
                    .navigate_previous(self.last_tape.as_ref(), &mut self.cursor, &self.router);
            }
            UserRequest::MusicState => {
                self.router.music_state(self.last_music.as_ref());
            }
        }
    }

    /// Latest tape snapshot with the simulated cursor's collision filled in
    fn tape_with_cursor(&self) -> Option<VideoTapeSnapshot> {
        let mut tape = self.last_tape.clone()?;
        if tape.cursor_target.is_none() {
            tape.cursor_target = self.cursor.cursor_target();
        }
        Some(tape)
    }
}
