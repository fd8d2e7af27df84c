//! Target navigation: cycle through active targets and park the cursor on one
//!
//! Placement:
//! 1. world position → cursor-parent local space
//! 2. shift by the hit-region offset (the hit box is not centred on the cursor origin)
//! 3. verify with a collision query; on a miss retry once without the shift
//! 4. still missing → report the placement as unverified, cursor stays at the estimate

use tracing::debug;

use crate::core::strings::Localizer;
use crate::types::{CursorNavigationCycle, NavigationOutcome, Placement, Target, Vec2};
use crate::{CURSOR_HIT_OFFSET, NO_COLLISION};

/// Narrow write access to the game's examination cursor
pub trait CursorSurface {
    /// World-space point → the cursor's parent space
    fn world_to_local(&self, world: Vec2) -> Vec2;

    /// Set the cursor's local position
    fn move_to(&mut self, local: Vec2);

    /// Collision number under the hit region, `NO_COLLISION` when none
    fn collided_no(&self) -> u32;

    fn is_on_target(&self) -> bool {
        self.collided_no() < NO_COLLISION
    }
}

/// Which way to step through the active targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// Cycles the cursor through active targets
#[derive(Debug, Clone)]
pub struct TargetNavigationSolver {
    cycle: CursorNavigationCycle,
    hit_offset: Vec2,
}

impl Default for TargetNavigationSolver {
    fn default() -> Self {
        Self::new(Vec2::new(CURSOR_HIT_OFFSET.0, CURSOR_HIT_OFFSET.1))
    }
}

impl TargetNavigationSolver {
    pub fn new(hit_offset: Vec2) -> Self {
        Self {
            cycle: CursorNavigationCycle::default(),
            hit_offset,
        }
    }

    pub fn cycle(&self) -> &CursorNavigationCycle {
        &self.cycle
    }

    /// Forget the position, e.g. when a new examination starts
    pub fn reset(&mut self) {
        self.cycle = CursorNavigationCycle::default();
    }

    pub fn next(&mut self, targets: &[Target], surface: &mut dyn CursorSurface) -> NavigationOutcome {
        self.step(CycleDirection::Next, targets, surface)
    }

    pub fn previous(
        &mut self,
        targets: &[Target],
        surface: &mut dyn CursorSurface,
    ) -> NavigationOutcome {
        self.step(CycleDirection::Previous, targets, surface)
    }

    /// Advance within the snapshot's active targets and move the cursor there
    pub fn step(
        &mut self,
        direction: CycleDirection,
        targets: &[Target],
        surface: &mut dyn CursorSurface,
    ) -> NavigationOutcome {
        let active: Vec<Target> = targets.iter().filter(|t| t.active).copied().collect();
        self.cycle.ordered_active_targets = active;

        let total = self.cycle.ordered_active_targets.len();
        if total == 0 {
            return NavigationOutcome::NoTargets;
        }

        // Positional only: if the set changed, the old index applies to the new ordering
        let index = match (direction, self.cycle.current_index) {
            (CycleDirection::Next, None) => 0,
            (CycleDirection::Next, Some(i)) => (i + 1) % total,
            (CycleDirection::Previous, None) | (CycleDirection::Previous, Some(0)) => total - 1,
            (CycleDirection::Previous, Some(i)) => (i - 1).min(total - 1),
        };
        self.cycle.current_index = Some(index);

        let target = self.cycle.ordered_active_targets[index];
        let placement = self.place(&target, surface);
        debug!(index, total, target = target.id, ?placement, "cursor moved to target");

        NavigationOutcome::Placed {
            index,
            total,
            target_id: target.id,
            placement,
        }
    }

    fn place(&self, target: &Target, surface: &mut dyn CursorSurface) -> Placement {
        let local = surface.world_to_local(target.position);

        surface.move_to(local + self.hit_offset);
        if surface.is_on_target() {
            return Placement::Offset;
        }

        // TODO: find out whether targets needing the unshifted position share a layout;
        // if so the offset sign should come from the layout instead of a retry
        surface.move_to(local);
        if surface.is_on_target() {
            Placement::Direct
        } else {
            Placement::Unverified
        }
    }
}

/// Spoken form of a navigation outcome
pub fn describe_navigation(outcome: &NavigationOutcome, strings: &dyn Localizer) -> String {
    match *outcome {
        NavigationOutcome::NoTargets => strings.get("tape.no_targets_at_frame"),
        NavigationOutcome::Placed {
            index,
            total,
            placement,
            ..
        } => {
            let key = match placement {
                Placement::Offset | Placement::Direct => "tape.target_present",
                Placement::Unverified => "tape.target_adjust",
            };
            strings.format(key, &[&(index + 1), &total])
        }
        NavigationOutcome::Unavailable(reason) => strings.get(reason.message_key()),
    }
}

// =============================================================================
// SIMULATED SURFACE
// =============================================================================

/// Cursor model for replays and tests
///
/// The cursor lives in a parent space whose origin sits at `parent_origin` in world
/// space. Its hit region is `hit_region` away from the cursor origin.
#[derive(Debug, Clone)]
pub struct SimulatedCursor {
    parent_origin: Vec2,
    hit_region: Vec2,
    local: Vec2,
    targets: Vec<Target>,
}

impl Default for SimulatedCursor {
    fn default() -> Self {
        Self::new(
            Vec2::ZERO,
            Vec2::new(-CURSOR_HIT_OFFSET.0, -CURSOR_HIT_OFFSET.1),
        )
    }
}

impl SimulatedCursor {
    pub fn new(parent_origin: Vec2, hit_region: Vec2) -> Self {
        Self {
            parent_origin,
            hit_region,
            local: Vec2::ZERO,
            targets: Vec::new(),
        }
    }

    /// Replace the collision areas the cursor can hit
    pub fn set_targets(&mut self, targets: &[Target]) {
        self.targets = targets.to_vec();
    }

    pub fn local_position(&self) -> Vec2 {
        self.local
    }

    /// World-space point the hit region covers
    pub fn hit_point(&self) -> Vec2 {
        self.parent_origin + self.local + self.hit_region
    }

    /// Collision number under the cursor, if any
    pub fn cursor_target(&self) -> Option<u32> {
        let no = self.collided_no();
        (no < NO_COLLISION).then_some(no)
    }
}

impl CursorSurface for SimulatedCursor {
    fn world_to_local(&self, world: Vec2) -> Vec2 {
        world - self.parent_origin
    }

    fn move_to(&mut self, local: Vec2) {
        self.local = local;
    }

    fn collided_no(&self) -> u32 {
        let point = self.hit_point();
        self.targets
            .iter()
            .find(|t| t.active && t.contains(point))
            .map(|t| t.id)
            .unwrap_or(NO_COLLISION)
    }
}

// =============================================================================
// TESTS
// =============================================================================
