//! game_narrator: announcement pipeline for screen-reader game accessibility
//!
//! Polled game state → change detection → routing/dedup → queue → timed drain → sink.
//! The vase puzzle and video tape solvers are invoked on demand and read live state.

pub mod core;
pub mod error;
pub mod types;

pub use error::{NarratorError, Result};

// =============================================================================
// DRAIN LOOP [C]
// =============================================================================

/// Wait after a successful delivery (milliseconds)
/// 25 ms keeps the sink at or under 40 announcements per second
pub const DRAIN_INTERVAL_MS: u64 = 25;

/// Re-poll delay while the queue is empty (milliseconds)
/// Roughly one engine frame
pub const IDLE_TICK_MS: u64 = 16;

// =============================================================================
// ROTATION PUZZLE [C]
// =============================================================================

/// Number of discrete rotation steps per piece (90° each)
pub const ROTATION_STEPS: u8 = 4;

/// Degrees per rotation step
pub const DEGREES_PER_STEP: u32 = 90;

/// Solve order for the 8-piece vase
pub const VASE_SOLUTION_8: [usize; 8] = [4, 3, 5, 0, 7, 2, 1, 6];

/// Solve order for the single final piece
pub const VASE_SOLUTION_1: [usize; 1] = [0];

// =============================================================================
// TARGET NAVIGATION [C]
// =============================================================================

/// Offset from cursor origin to the centre of its hit region (cursor-local units)
/// The hit region sits at (-30, +30) from the origin, so the origin moves by the opposite
pub const CURSOR_HIT_OFFSET: (f32, f32) = (30.0, -30.0);

/// Collision index reported when the cursor overlaps nothing
pub const NO_COLLISION: u32 = 4;

// =============================================================================
// INVESTIGATION CURSOR SPRITES [C]
// =============================================================================

/// Cursor over an unexamined point of interest
pub const SPRITE_UNEXAMINED: i32 = 1;

/// Cursor over an already examined point
pub const SPRITE_EXAMINED: i32 = 3;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
