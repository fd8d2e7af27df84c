//! Read-only game state snapshots
//!
//! Produced once per poll by whatever reads the host game. A field the reader could
//! not fill is `None`; a whole snapshot of `None` means the minigame object does not
//! exist yet, which monitors treat as inactive.

use serde::{Deserialize, Serialize};

use crate::types::{PieceState, Target};

/// Vase puzzle minigame state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VasePuzzleSnapshot {
    /// Minigame process id; 0 means not running
    pub proc_id: u8,
    /// Solution steps already satisfied
    #[serde(default)]
    pub puzzle_step: Option<usize>,
    /// Tray cursor
    #[serde(default)]
    pub cursor: Option<usize>,
    /// Every piece in the tray
    #[serde(default)]
    pub pieces: Option<Vec<PieceState>>,
}

impl VasePuzzleSnapshot {
    pub fn is_active(&self) -> bool {
        self.proc_id != 0
    }
}

/// Video tape examination state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoTapeSnapshot {
    /// Movie controller exists and is running
    pub active: bool,
    /// Tape is playing rather than paused
    #[serde(default)]
    pub playing: bool,
    /// Current movie frame
    #[serde(default)]
    pub frame: u32,
    /// Which viewing of the tape this is (0-based)
    #[serde(default)]
    pub examination: u8,
    /// All collision areas, active or not, in game order
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Collision number under the cursor, if any
    #[serde(default)]
    pub cursor_target: Option<u32>,
}

impl VideoTapeSnapshot {
    pub fn active_target_count(&self) -> usize {
        self.targets.iter().filter(|t| t.active).count()
    }
}

/// Music player state, read when the player asks for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicPlayerSnapshot {
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub song_title: Option<String>,
    #[serde(default)]
    pub song_index: Option<usize>,
    #[serde(default)]
    pub playing: bool,
    #[serde(default)]
    pub play_mode: Option<String>,
}
