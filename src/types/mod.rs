//! Core types for the narrator

mod announcement;
mod context;
mod output;
mod puzzle;
mod reason;
mod snapshot;
mod target;

pub use announcement::{Announcement, Category, DedupScope};
pub use context::{BloodstainState, DetectiveMenuKind, OptionsCategory, SaveLoadKind, SelectionKind};
pub use output::DeliveredLine;
pub use puzzle::{PieceState, PuzzleSolution, RotationDirection, RotationHint, StepDirection};
pub use reason::UnavailableReason;
pub use snapshot::{MusicPlayerSnapshot, VasePuzzleSnapshot, VideoTapeSnapshot};
pub use target::{CursorNavigationCycle, NavigationOutcome, Placement, Target, Vec2};
