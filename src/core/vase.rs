//! Vase puzzle monitor
//!
//! Announces entry into the minigame and answers hint / state requests through
//! the rotation solver.

use tracing::debug;

use crate::core::detector::{ActiveEdge, Edge};
use crate::core::rotation::{describe_hint, describe_piece, PieceReport, RotationPuzzleSolver};
use crate::core::router::AnnouncementRouter;
use crate::types::{Category, RotationHint, VasePuzzleSnapshot};

#[derive(Debug, Default)]
pub struct VasePuzzleMonitor {
    solver: RotationPuzzleSolver,
    active: ActiveEdge,
}

impl VasePuzzleMonitor {
    pub fn new(solver: RotationPuzzleSolver) -> Self {
        Self {
            solver,
            active: ActiveEdge::new(),
        }
    }

    pub fn solver(&self) -> &RotationPuzzleSolver {
        &self.solver
    }

    pub fn is_active(&self) -> bool {
        self.active.is_active()
    }

    /// One poll; a missing snapshot counts as inactive
    pub fn poll(&mut self, snapshot: Option<&VasePuzzleSnapshot>, router: &AnnouncementRouter) {
        let active = snapshot.is_some_and(VasePuzzleSnapshot::is_active);
        match self.active.observe(active) {
            Edge::Entered => {
                let final_piece = snapshot
                    .and_then(|s| s.pieces.as_ref())
                    .is_some_and(|p| p.len() == 1);
                debug!(final_piece, "vase puzzle started");
                let key = if final_piece {
                    "vase.start_final"
                } else {
                    "vase.start"
                };
                router.announce(router.strings().get(key), Category::Investigation);
            }
            Edge::Exited => debug!("vase puzzle ended"),
            Edge::Steady => {}
        }
    }

    /// Hint request
    pub fn hint(&self, snapshot: Option<&VasePuzzleSnapshot>, router: &AnnouncementRouter) -> RotationHint {
        let hint = self.solver.hint(snapshot);
        let category = match hint {
            RotationHint::Unavailable(reason) => reason.category(),
            _ => Category::Investigation,
        };
        router.respond(describe_hint(&hint, router.strings()), category);
        hint
    }

    /// State request
    pub fn state(&self, snapshot: Option<&VasePuzzleSnapshot>, router: &AnnouncementRouter) -> PieceReport {
        let report = self.solver.state(snapshot);
        let category = match report {
            PieceReport::Unavailable(reason) => reason.category(),
            PieceReport::Piece { .. } => Category::Investigation,
        };
        router.respond(describe_piece(&report, router.strings()), category);
        report
    }
}
