//! Rotation puzzle types

use serde::{Deserialize, Serialize};

use crate::types::UnavailableReason;

/// One puzzle piece as observed in a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceState {
    /// Position in the piece tray (0-based, shown 1-based)
    pub index: usize,
    /// Quarter turns away from upright, 0..=3
    pub rotation_step: u8,
    /// Already combined into the vase
    #[serde(default)]
    pub placed: bool,
}

impl PieceState {
    pub fn new(index: usize, rotation_step: u8) -> Self {
        Self {
            index,
            rotation_step,
            placed: false,
        }
    }
}

/// Correct solve order for one puzzle variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSolution {
    /// Variant key: number of pieces in the tray
    pub piece_count: usize,
    /// Piece index required at each step
    pub order: Vec<usize>,
}

impl PuzzleSolution {
    pub fn new(piece_count: usize, order: impl Into<Vec<usize>>) -> Self {
        Self {
            piece_count,
            order: order.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Rotation key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    /// R key: decrements the step (3→2→1→0), clockwise
    Clockwise,
    /// Q key: increments the step (1→2→3→0), counter-clockwise
    CounterClockwise,
}

/// Tray navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Left,
    Right,
}

/// Result of asking the rotation solver for guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationHint {
    /// Every step of the solution is satisfied
    Complete,
    /// Correct piece, upright: commit it
    ReadyToCommit { remaining: usize },
    /// Correct piece, needs turning
    Rotate {
        remaining: usize,
        direction: RotationDirection,
        presses: u8,
    },
    /// Wrong piece under the cursor
    SelectPiece {
        remaining: usize,
        piece: usize,
        direction: StepDirection,
    },
    /// Could not compute from this snapshot
    Unavailable(UnavailableReason),
}

impl RotationHint {
    /// Pieces still to place, when the hint carries it
    pub fn remaining(&self) -> Option<usize> {
        match self {
            Self::ReadyToCommit { remaining }
            | Self::Rotate { remaining, .. }
            | Self::SelectPiece { remaining, .. } => Some(*remaining),
            Self::Complete | Self::Unavailable(_) => None,
        }
    }
}
