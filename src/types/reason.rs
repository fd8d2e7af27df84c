//! Reason codes for "not available" outcomes
//! A solver or monitor that cannot answer returns one of these instead of failing

use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Why a hint, state query or navigation request produced no guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum UnavailableReason {
    // =========================================================================
    // U001: Mode not active
    // =========================================================================
    /// Vase puzzle is not running
    U001_NOT_IN_VASE_PUZZLE,
    /// Video tape examination is not running
    U001_NOT_IN_VIDEO_TAPE,

    // =========================================================================
    // U002: State unreadable
    // =========================================================================
    /// Step, cursor or pieces field missing
    U002_PUZZLE_STATE_UNREADABLE,
    /// Pieces array missing or cursor outside it
    U002_PIECES_UNREADABLE,

    // =========================================================================
    // U003: Wrong sub-state
    // =========================================================================
    /// Target navigation requested while the tape plays
    U003_VIDEO_PLAYING,
}

impl UnavailableReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::U001_NOT_IN_VASE_PUZZLE => "U001_NOT_IN_VASE_PUZZLE",
            Self::U001_NOT_IN_VIDEO_TAPE => "U001_NOT_IN_VIDEO_TAPE",
            Self::U002_PUZZLE_STATE_UNREADABLE => "U002_PUZZLE_STATE_UNREADABLE",
            Self::U002_PIECES_UNREADABLE => "U002_PIECES_UNREADABLE",
            Self::U003_VIDEO_PLAYING => "U003_VIDEO_PLAYING",
        }
    }

    /// Category the response is announced under
    pub fn category(&self) -> Category {
        match self {
            Self::U003_VIDEO_PLAYING => Category::Investigation,
            _ => Category::SystemMessage,
        }
    }

    /// Localization key of the user-facing line
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::U001_NOT_IN_VASE_PUZZLE => "vase.not_active",
            Self::U001_NOT_IN_VIDEO_TAPE => "tape.not_active",
            Self::U002_PUZZLE_STATE_UNREADABLE => "vase.state_unreadable",
            Self::U002_PIECES_UNREADABLE => "vase.pieces_unreadable",
            Self::U003_VIDEO_PLAYING => "tape.pause_first",
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
