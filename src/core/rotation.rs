//! Rotation puzzle solver
//!
//! Pure function of (solution, step, cursor, pieces):
//! 1. step past the end → complete
//! 2. cursor on the required piece → commit, or the shorter rotation
//! 3. otherwise → which piece to select and which way to move
//!
//! Rotation keys: R decrements the step (3→2→1→0), Q increments it (1→2→3→0).
//! Ties go to R.

use serde::Serialize;

use crate::core::strings::Localizer;
use crate::types::{
    PieceState, PuzzleSolution, RotationDirection, RotationHint, StepDirection,
    UnavailableReason, VasePuzzleSnapshot,
};
use crate::{DEGREES_PER_STEP, ROTATION_STEPS, VASE_SOLUTION_1, VASE_SOLUTION_8};

/// Solutions keyed by the number of pieces in the tray
#[derive(Debug, Clone)]
pub struct SolutionBook {
    variants: Vec<PuzzleSolution>,
    fallback: PuzzleSolution,
}

impl Default for SolutionBook {
    fn default() -> Self {
        Self::standard()
    }
}

impl SolutionBook {
    /// The two vase variants: full 8-piece vase and the single final piece
    pub fn standard() -> Self {
        let full = PuzzleSolution::new(8, VASE_SOLUTION_8);
        let mut book = Self::new(full);
        book.insert(PuzzleSolution::new(1, VASE_SOLUTION_1));
        book
    }

    /// Book whose only entry is also the fallback for unknown piece counts
    pub fn new(fallback: PuzzleSolution) -> Self {
        Self {
            variants: vec![fallback.clone()],
            fallback,
        }
    }

    /// Add or replace a variant
    pub fn insert(&mut self, solution: PuzzleSolution) {
        self.variants.retain(|s| s.piece_count != solution.piece_count);
        self.variants.push(solution);
    }

    /// Exact variant for `piece_count`, else the fallback
    pub fn for_piece_count(&self, piece_count: usize) -> &PuzzleSolution {
        self.variants
            .iter()
            .find(|s| s.piece_count == piece_count)
            .unwrap_or(&self.fallback)
    }
}

/// Compute the next-move hint from one snapshot's worth of values
pub fn solve(
    solution: &PuzzleSolution,
    puzzle_step: usize,
    cursor: usize,
    pieces: &[PieceState],
) -> RotationHint {
    if puzzle_step >= solution.len() {
        return RotationHint::Complete;
    }

    let target = solution.order[puzzle_step];
    let remaining = solution.len() - puzzle_step;

    if cursor != target {
        let direction = if target > cursor {
            StepDirection::Right
        } else {
            StepDirection::Left
        };
        return RotationHint::SelectPiece {
            remaining,
            piece: target,
            direction,
        };
    }

    let Some(piece) = pieces.iter().find(|p| p.index == target) else {
        return RotationHint::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE);
    };

    let step = piece.rotation_step % ROTATION_STEPS;
    if step == 0 {
        return RotationHint::ReadyToCommit { remaining };
    }

    let clockwise = step;
    let counter_clockwise = ROTATION_STEPS - step;
    let (direction, presses) = if clockwise <= counter_clockwise {
        (RotationDirection::Clockwise, clockwise)
    } else {
        (RotationDirection::CounterClockwise, counter_clockwise)
    };

    RotationHint::Rotate {
        remaining,
        direction,
        presses,
    }
}

/// What the player has under the cursor right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PieceReport {
    Piece {
        /// 1-based number as shown on screen
        display: usize,
        placed: bool,
        degrees: u32,
        remaining: usize,
    },
    Unavailable(UnavailableReason),
}

/// Reads snapshots and answers hint / state requests
#[derive(Debug, Clone, Default)]
pub struct RotationPuzzleSolver {
    book: SolutionBook,
}

impl RotationPuzzleSolver {
    pub fn new(book: SolutionBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &SolutionBook {
        &self.book
    }

    /// Hint for the live puzzle; `None` snapshot means the minigame is not running
    pub fn hint(&self, snapshot: Option<&VasePuzzleSnapshot>) -> RotationHint {
        let Some(snapshot) = snapshot.filter(|s| s.is_active()) else {
            return RotationHint::Unavailable(UnavailableReason::U001_NOT_IN_VASE_PUZZLE);
        };
        let (Some(step), Some(cursor)) = (snapshot.puzzle_step, snapshot.cursor) else {
            return RotationHint::Unavailable(UnavailableReason::U002_PUZZLE_STATE_UNREADABLE);
        };
        let Some(pieces) = snapshot.pieces.as_deref() else {
            return RotationHint::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE);
        };
        let solution = self.book.for_piece_count(pieces.len());
        solve(solution, step, cursor, pieces)
    }

    /// Piece under the cursor and how far along the puzzle is
    pub fn state(&self, snapshot: Option<&VasePuzzleSnapshot>) -> PieceReport {
        let Some(snapshot) = snapshot.filter(|s| s.is_active()) else {
            return PieceReport::Unavailable(UnavailableReason::U001_NOT_IN_VASE_PUZZLE);
        };
        let (Some(step), Some(cursor)) = (snapshot.puzzle_step, snapshot.cursor) else {
            return PieceReport::Unavailable(UnavailableReason::U002_PUZZLE_STATE_UNREADABLE);
        };
        let Some(pieces) = snapshot.pieces.as_deref() else {
            return PieceReport::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE);
        };
        let Some(piece) = pieces.iter().find(|p| p.index == cursor) else {
            return PieceReport::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE);
        };

        let solution = self.book.for_piece_count(pieces.len());
        PieceReport::Piece {
            display: cursor.saturating_add(1),
            placed: piece.placed,
            degrees: u32::from(piece.rotation_step % ROTATION_STEPS) * DEGREES_PER_STEP,
            remaining: solution.len().saturating_sub(step),
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Spoken form of a hint
pub fn describe_hint(hint: &RotationHint, strings: &dyn Localizer) -> String {
    let mut parts = Vec::new();
    if let Some(remaining) = hint.remaining() {
        parts.push(strings.plural("vase.pieces_remaining", remaining, &[]));
    }

    match *hint {
        RotationHint::Complete => parts.push(strings.get("vase.complete")),
        RotationHint::ReadyToCommit { .. } => {
            parts.push(strings.get("vase.correct_piece"));
            parts.push(strings.get("vase.ready"));
        }
        RotationHint::Rotate {
            direction, presses, ..
        } => {
            parts.push(strings.get("vase.correct_piece"));
            let key = match direction {
                RotationDirection::Clockwise => "vase.rotate_clockwise",
                RotationDirection::CounterClockwise => "vase.rotate_counter_clockwise",
            };
            parts.push(strings.plural(key, usize::from(presses), &[]));
        }
        RotationHint::SelectPiece {
            piece, direction, ..
        } => {
            parts.push(strings.format("vase.select_piece", &[&piece.saturating_add(1)]));
            parts.push(strings.get(match direction {
                StepDirection::Right => "vase.navigate_right",
                StepDirection::Left => "vase.navigate_left",
            }));
        }
        RotationHint::Unavailable(reason) => parts.push(strings.get(reason.message_key())),
    }

    parts.join(" ")
}

/// Spoken form of a piece report
pub fn describe_piece(report: &PieceReport, strings: &dyn Localizer) -> String {
    match *report {
        PieceReport::Piece {
            display,
            placed,
            degrees,
            remaining,
        } => {
            let piece = if placed {
                strings.format("vase.piece_placed", &[&display])
            } else {
                strings.format("vase.piece_rotated", &[&display, &degrees])
            };
            format!(
                "{} {}",
                piece,
                strings.plural("vase.pieces_remaining", remaining, &[])
            )
        }
        PieceReport::Unavailable(reason) => strings.get(reason.message_key()),
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

    fn tray(steps: &[u8]) -> Vec<PieceState> {
        steps
            .iter()
            .enumerate()
            .map(|(i, &s)| PieceState::new(i, s))
            .collect()
    }

    fn full() -> PuzzleSolution {
        PuzzleSolution::new(8, VASE_SOLUTION_8)
    }

    #[test]
    fn test_press_count_is_minimal() {
        for step in 1..ROTATION_STEPS {
            let mut steps = [0u8; 8];
            steps[4] = step;
            let hint = solve(&full(), 0, 4, &tray(&steps));
            let RotationHint::Rotate { presses, direction, .. } = hint else {
                panic!("expected rotate hint, got {:?}", hint);
            };
            assert_eq!(presses, step.min(ROTATION_STEPS - step));
            if step <= 2 {
                assert_eq!(direction, RotationDirection::Clockwise);
            } else {
                assert_eq!(direction, RotationDirection::CounterClockwise);
            }
        }
    }

    #[test]
    fn test_half_turn_tie_goes_clockwise() {
        let mut steps = [0u8; 8];
        steps[4] = 2;
        assert_eq!(
            solve(&full(), 0, 4, &tray(&steps)),
            RotationHint::Rotate {
                remaining: 8,
                direction: RotationDirection::Clockwise,
                presses: 2
            }
        );
    }

    #[test]
    fn test_upright_piece_ready() {
        let hint = solve(&full(), 1, 3, &tray(&[0; 8]));
        assert_eq!(hint, RotationHint::ReadyToCommit { remaining: 7 });
    }

    #[test]
    fn test_wrong_piece_direction() {
        let pieces = tray(&[0; 8]);
        assert_eq!(
            solve(&full(), 0, 0, &pieces),
            RotationHint::SelectPiece {
                remaining: 8,
                piece: 4,
                direction: StepDirection::Right
            }
        );
        assert_eq!(
            solve(&full(), 0, 7, &pieces),
            RotationHint::SelectPiece {
                remaining: 8,
                piece: 4,
                direction: StepDirection::Left
            }
        );
    }

    #[test]
    fn test_complete_ignores_cursor_and_pieces() {
        assert_eq!(solve(&full(), 8, 0, &[]), RotationHint::Complete);
        assert_eq!(solve(&full(), 9, 42, &tray(&[3; 8])), RotationHint::Complete);
    }

    #[test]
    fn test_missing_target_piece_is_unavailable() {
        assert_eq!(
            solve(&full(), 0, 4, &tray(&[0; 3])),
            RotationHint::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE)
        );
    }

    #[test]
    fn test_book_lookup_and_fallback() {
        let book = SolutionBook::standard();
        assert_eq!(book.for_piece_count(1).order, vec![0]);
        assert_eq!(book.for_piece_count(8).order, VASE_SOLUTION_8.to_vec());
        assert_eq!(book.for_piece_count(5).piece_count, 8);
    }

    #[test]
    fn test_describe_rotate_hint() {
        let strings = StringTable::english();
        let mut steps = [0u8; 8];
        steps[4] = 3;
        let hint = solve(&full(), 0, 4, &tray(&steps));
        assert_eq!(
            describe_hint(&hint, &strings),
            "8 pieces remaining. Correct piece selected. Press Q 1 time to rotate."
        );
    }

    #[test]
    fn test_describe_select_hint_uses_display_number() {
        let strings = StringTable::english();
        let hint = solve(&full(), 0, 0, &tray(&[0; 8]));
        assert_eq!(
            describe_hint(&hint, &strings),
            "8 pieces remaining. Select piece 5. Press Right to navigate."
        );
    }

    #[test]
    fn test_describe_last_piece_singular() {
        let strings = StringTable::english();
        let solution = PuzzleSolution::new(1, VASE_SOLUTION_1);
        let hint = solve(&solution, 0, 0, &tray(&[0]));
        assert_eq!(
            describe_hint(&hint, &strings),
            "1 piece remaining. Correct piece selected. Rotation correct. Press E to combine."
        );
    }

    #[test]
    fn test_state_report() {
        let solver = RotationPuzzleSolver::default();
        let mut pieces = tray(&[0, 0, 3, 0, 0, 0, 0, 0]);
        pieces[0].placed = true;
        let mut snapshot = VasePuzzleSnapshot {
            proc_id: 3,
            puzzle_step: Some(4),
            cursor: Some(2),
            pieces: Some(pieces),
        };
        let strings = StringTable::english();
        assert_eq!(
            describe_piece(&solver.state(Some(&snapshot)), &strings),
            "Piece 3, rotated 270 degrees. 4 pieces remaining."
        );

        snapshot.cursor = Some(0);
        assert_eq!(
            describe_piece(&solver.state(Some(&snapshot)), &strings),
            "Piece 1 (already placed). 4 pieces remaining."
        );
    }

    #[test]
    fn test_state_report_at_extreme_cursor() {
        let solver = RotationPuzzleSolver::default();
        let snapshot = VasePuzzleSnapshot {
            proc_id: 3,
            puzzle_step: Some(0),
            cursor: Some(usize::MAX),
            pieces: Some(vec![PieceState::new(usize::MAX, 1)]),
        };
        assert_eq!(
            solver.state(Some(&snapshot)),
            PieceReport::Piece {
                display: usize::MAX,
                placed: false,
                degrees: 90,
                remaining: 1,
            }
        );
    }

    #[test]
    fn test_inactive_and_unreadable_snapshots() {
        let solver = RotationPuzzleSolver::default();
        assert_eq!(
            solver.hint(None),
            RotationHint::Unavailable(UnavailableReason::U001_NOT_IN_VASE_PUZZLE)
        );
        let idle = VasePuzzleSnapshot::default();
        assert_eq!(
            solver.hint(Some(&idle)),
            RotationHint::Unavailable(UnavailableReason::U001_NOT_IN_VASE_PUZZLE)
        );
        let partial = VasePuzzleSnapshot {
            proc_id: 3,
            puzzle_step: Some(0),
            cursor: None,
            pieces: Some(tray(&[0; 8])),
        };
        assert_eq!(
            solver.hint(Some(&partial)),
            RotationHint::Unavailable(UnavailableReason::U002_PUZZLE_STATE_UNREADABLE)
        );
        let no_pieces = VasePuzzleSnapshot {
            cursor: Some(4),
            pieces: None,
            ..partial
        };
        assert_eq!(
            solver.hint(Some(&no_pieces)),
            RotationHint::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE)
        );
        assert_eq!(
            solver.state(Some(&no_pieces)),
            PieceReport::Unavailable(UnavailableReason::U002_PIECES_UNREADABLE)
        );
    }
}
