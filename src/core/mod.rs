//! Core modules for the narrator pipeline

pub mod queue;
pub mod sink;
pub mod drain;
pub mod detector;
pub mod strings;
pub mod rotation;
pub mod navigation;
pub mod router;
pub mod vase;
pub mod tape;
pub mod replay;

pub use queue::{AnnouncementQueue, DedupState, QueueHandle};
pub use sink::{ConsoleSink, DeliverySink, OutputMode, RecordingSink};
pub use drain::{DrainHandle, DrainLoop, DrainStats, PipelineConfig};
pub use detector::{combine_fragments, ActiveEdge, Edge, TextCombiner, ValueChange};
pub use strings::{Localizer, StringTable};
pub use rotation::{describe_hint, describe_piece, solve, PieceReport, RotationPuzzleSolver, SolutionBook};
pub use navigation::{describe_navigation, CursorSurface, CycleDirection, SimulatedCursor, TargetNavigationSolver};
pub use router::AnnouncementRouter;
pub use vase::VasePuzzleMonitor;
pub use tape::VideoTapeMonitor;
pub use replay::{parse_event, parse_script, ScriptEvent, Session, UserRequest};
