//! Target navigation types

use serde::{Deserialize, Serialize};

use crate::types::UnavailableReason;

/// 2D point or offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A spatial region the player can present, as observed in a poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Collision number reported by the cursor when overlapping this target
    pub id: u32,
    /// Centre in world space
    pub position: Vec2,
    /// Half width / half height in world space
    #[serde(default)]
    pub half_size: Vec2,
    /// Currently eligible for interaction
    pub active: bool,
}

impl Target {
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.position.x).abs() <= self.half_size.x
            && (point.y - self.position.y).abs() <= self.half_size.y
    }
}

/// Navigation cursor state kept between "next"/"previous" requests
///
/// The ordering is re-derived from each snapshot; only the position survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorNavigationCycle {
    /// Active targets in snapshot order, as of the last request
    pub ordered_active_targets: Vec<Target>,
    /// Position within that ordering; `None` before the first request
    pub current_index: Option<usize>,
}

/// How the cursor ended up on the chosen target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Hit confirmed with the hit-region offset applied
    Offset,
    /// Hit confirmed only after retrying without the offset
    Direct,
    /// Neither attempt confirmed a hit; cursor left at the raw estimate
    Unverified,
}

/// Result of a "next"/"previous" target request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NavigationOutcome {
    /// Active set empty; cursor untouched
    NoTargets,
    /// Cursor moved to target `index + 1` of `total`
    Placed {
        index: usize,
        total: usize,
        target_id: u32,
        placement: Placement,
    },
    Unavailable(UnavailableReason),
}
