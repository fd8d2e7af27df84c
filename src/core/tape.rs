//! Video tape examination monitor
//!
//! Tracks play/pause and target appearance edges while the tape is up, and routes
//! state, hint and target-navigation requests.

use tracing::debug;

use crate::core::detector::{ActiveEdge, Edge};
use crate::core::navigation::{describe_navigation, CursorSurface, CycleDirection, TargetNavigationSolver};
use crate::core::router::AnnouncementRouter;
use crate::types::{Category, NavigationOutcome, UnavailableReason, VideoTapeSnapshot};

#[derive(Debug, Default)]
pub struct VideoTapeMonitor {
    active: ActiveEdge,
    playing: ActiveEdge,
    last_target_count: usize,
    navigator: TargetNavigationSolver,
}

impl VideoTapeMonitor {
    pub fn new(navigator: TargetNavigationSolver) -> Self {
        Self {
            navigator,
            ..Self::default()
        }
    }

    pub fn navigator(&self) -> &TargetNavigationSolver {
        &self.navigator
    }

    pub fn is_active(&self) -> bool {
        self.active.is_active()
    }

    /// One poll; a missing snapshot counts as inactive
    pub fn poll(&mut self, snapshot: Option<&VideoTapeSnapshot>, router: &AnnouncementRouter) {
        let tape = snapshot.filter(|s| s.active);
        let strings = router.strings();

        match self.active.observe(tape.is_some()) {
            Edge::Entered => {
                debug!("video tape examination started");
                self.last_target_count = 0;
                self.navigator.reset();
                router.announce(strings.get("tape.start"), Category::Investigation);
            }
            Edge::Exited => {
                debug!("video tape examination ended");
                self.last_target_count = 0;
            }
            Edge::Steady => {}
        }

        // Inactive polls record "not playing", so re-entering mid-play announces "Playing"
        let playing = tape.is_some_and(|t| t.playing);
        let play_edge = self.playing.observe(playing);

        let Some(tape) = tape else {
            return;
        };

        match play_edge {
            Edge::Entered => {
                router.announce(strings.get("tape.playing"), Category::Investigation);
            }
            Edge::Exited => {
                let count = tape.active_target_count();
                let text = if count > 0 {
                    strings.plural("tape.paused_targets", count, &[&tape.frame])
                } else {
                    strings.format("tape.paused", &[&tape.frame])
                };
                router.announce(text, Category::Investigation);
            }
            Edge::Steady => {}
        }

        let count = tape.active_target_count();
        if count > 0 && self.last_target_count == 0 {
            debug!(frame = tape.frame, count, "targets appeared");
            router.announce(strings.get("tape.target_available"), Category::Investigation);
        }
        self.last_target_count = count;
    }

    /// Spoken state line, or the reason there is none
    pub fn describe_state(&self, snapshot: Option<&VideoTapeSnapshot>, router: &AnnouncementRouter) -> (String, Category) {
        let strings = router.strings();
        let Some(tape) = snapshot.filter(|s| s.active) else {
            let reason = UnavailableReason::U001_NOT_IN_VIDEO_TAPE;
            return (strings.get(reason.message_key()), reason.category());
        };

        let state = strings.format(
            if tape.playing {
                "tape.state_playing"
            } else {
                "tape.state_paused"
            },
            &[&tape.frame],
        );
        let count = tape.active_target_count();
        let mut targets = if count > 0 {
            strings.plural("tape.targets_available", count, &[])
        } else {
            strings.get("tape.no_targets")
        };
        if let Some(no) = tape.cursor_target {
            targets.push_str(", ");
            targets.push_str(&strings.format("tape.cursor_on_target", &[&no.saturating_add(1)]));
        }
        (format!("{} {}.", state, targets), Category::Investigation)
    }

    /// State request
    pub fn state(&self, snapshot: Option<&VideoTapeSnapshot>, router: &AnnouncementRouter) -> String {
        let (text, category) = self.describe_state(snapshot, router);
        router.respond(text.clone(), category);
        text
    }

    /// Hint request; the hint depends on which viewing of the tape this is
    pub fn hint(&self, snapshot: Option<&VideoTapeSnapshot>, router: &AnnouncementRouter) -> String {
        let strings = router.strings();
        let (text, category) = match snapshot.filter(|s| s.active) {
            Some(tape) => {
                let key = match tape.examination {
                    0..=3 => format!("tape.hint.{}", tape.examination),
                    _ => "tape.hint.default".to_string(),
                };
                (strings.format(&key, &[&tape.frame]), Category::Investigation)
            }
            None => {
                let reason = UnavailableReason::U001_NOT_IN_VIDEO_TAPE;
                (strings.get(reason.message_key()), reason.category())
            }
        };
        router.respond(text.clone(), category);
        text
    }

    pub fn navigate_next(
        &mut self,
        snapshot: Option<&VideoTapeSnapshot>,
        surface: &mut dyn CursorSurface,
        router: &AnnouncementRouter,
    ) -> NavigationOutcome {
        self.navigate(CycleDirection::Next, snapshot, surface, router)
    }

    pub fn navigate_previous(
        &mut self,
        snapshot: Option<&VideoTapeSnapshot>,
        surface: &mut dyn CursorSurface,
        router: &AnnouncementRouter,
    ) -> NavigationOutcome {
        self.navigate(CycleDirection::Previous, snapshot, surface, router)
    }

    /// Move the cursor to the next or previous target; only allowed while paused
    pub fn navigate(
        &mut self,
        direction: CycleDirection,
        snapshot: Option<&VideoTapeSnapshot>,
        surface: &mut dyn CursorSurface,
        router: &AnnouncementRouter,
    ) -> NavigationOutcome {
        let outcome = match snapshot.filter(|s| s.active) {
            None => NavigationOutcome::Unavailable(UnavailableReason::U001_NOT_IN_VIDEO_TAPE),
            Some(tape) if tape.playing => {
                NavigationOutcome::Unavailable(UnavailableReason::U003_VIDEO_PLAYING)
            }
            Some(tape) => self.navigator.step(direction, &tape.targets, surface),
        };

        let category = match outcome {
            NavigationOutcome::Unavailable(reason) => reason.category(),
            _ => Category::Investigation,
        };
        router.respond(describe_navigation(&outcome, router.strings()), category);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::navigation::SimulatedCursor;
    use crate::core::queue::QueueHandle;
    use crate::core::strings::StringTable;
    use crate::types::{Placement, Target, Vec2};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn router() -> AnnouncementRouter {
        AnnouncementRouter::new(QueueHandle::new(), Arc::new(StringTable::english()))
    }

    fn texts(router: &AnnouncementRouter) -> Vec<String> {
        std::iter::from_fn(|| router.queue().dequeue())
            .map(|a| a.into_text())
            .collect()
    }

    fn target(id: u32, x: f32, active: bool) -> Target {
        Target {
            id,
            position: Vec2::new(x, 100.0),
            half_size: Vec2::new(20.0, 20.0),
            active,
        }
    }

    fn tape(playing: bool, frame: u32, targets: Vec<Target>) -> VideoTapeSnapshot {
        VideoTapeSnapshot {
            active: true,
            playing,
            frame,
            targets,
            ..VideoTapeSnapshot::default()
        }
    }

    #[test]
    fn test_play_pause_and_target_edges() {
        let router = router();
        let mut monitor = VideoTapeMonitor::default();

        monitor.poll(Some(&tape(false, 0, vec![])), &router);
        monitor.poll(Some(&tape(true, 10, vec![])), &router);
        monitor.poll(Some(&tape(true, 480, vec![target(0, 100.0, true)])), &router);
        monitor.poll(Some(&tape(true, 481, vec![target(0, 100.0, true)])), &router);
        monitor.poll(Some(&tape(false, 490, vec![target(0, 100.0, true)])), &router);

        let lines = texts(&router);
        assert!(lines[0].starts_with("Video tape examination."));
        assert_eq!(
            &lines[1..],
            &[
                "Playing",
                "Target available! Pause with Backspace.",
                "Paused at frame 490, 1 target",
            ]
        );
    }

    #[test]
    fn test_pause_without_targets() {
        let router = router();
        let mut monitor = VideoTapeMonitor::default();
        monitor.poll(Some(&tape(true, 5, vec![])), &router);
        monitor.poll(Some(&tape(false, 42, vec![])), &router);
        assert_eq!(texts(&router).last().map(String::as_str), Some("Paused at frame 42"));
    }

    #[test]
    fn test_state_line() {
        let router = router();
        let monitor = VideoTapeMonitor::default();
        let mut paused = tape(false, 490, vec![target(0, 100.0, true), target(1, 200.0, true)]);
        paused.cursor_target = Some(1);

        assert_eq!(
            monitor.state(Some(&paused), &router),
            "Paused, frame 490. 2 targets available, cursor on target 2."
        );
        assert_eq!(
            monitor.state(Some(&tape(true, 12, vec![])), &router),
            "Playing, frame 12. No targets."
        );
        assert_eq!(monitor.state(None, &router), "Not in video tape mode");
    }

    #[test]
    fn test_state_line_with_extreme_cursor_target() {
        let router = router();
        let monitor = VideoTapeMonitor::default();
        let mut paused = tape(false, 7, vec![]);
        paused.cursor_target = Some(u32::MAX);
        assert_eq!(
            monitor.state(Some(&paused), &router),
            "Paused, frame 7. No targets, cursor on target 4294967295."
        );
    }

    #[test]
    fn test_hint_by_examination() {
        let router = router();
        let monitor = VideoTapeMonitor::default();
        let mut second = tape(false, 470, vec![]);
        second.examination = 1;
        assert!(monitor
            .hint(Some(&second), &router)
            .starts_with("Second viewing"));

        second.examination = 9;
        assert!(monitor
            .hint(Some(&second), &router)
            .ends_with("Current frame: 470."));
    }

    #[test]
    fn test_navigation_refused_while_playing() {
        let router = router();
        let mut monitor = VideoTapeMonitor::default();
        let mut cursor = SimulatedCursor::default();

        let playing = tape(true, 480, vec![target(0, 100.0, true)]);
        assert_eq!(
            monitor.navigate_next(Some(&playing), &mut cursor, &router),
            NavigationOutcome::Unavailable(UnavailableReason::U003_VIDEO_PLAYING)
        );
        assert_eq!(
            monitor.navigate_next(None, &mut cursor, &router),
            NavigationOutcome::Unavailable(UnavailableReason::U001_NOT_IN_VIDEO_TAPE)
        );
        assert_eq!(
            texts(&router),
            vec!["Pause the video first with Backspace", "Not in video tape mode"]
        );
    }

    #[test]
    fn test_navigation_while_paused() {
        let router = router();
        let mut monitor = VideoTapeMonitor::default();
        let paused = tape(
            false,
            490,
            vec![target(0, 100.0, true), target(1, 200.0, false), target(2, 300.0, true)],
        );
        let mut cursor = SimulatedCursor::default();
        cursor.set_targets(&paused.targets);

        let outcome = monitor.navigate_previous(Some(&paused), &mut cursor, &router);
        assert_eq!(
            outcome,
            NavigationOutcome::Placed {
                index: 1,
                total: 2,
                target_id: 2,
                placement: Placement::Offset,
            }
        );
        assert_eq!(cursor.cursor_target(), Some(2));
        assert_eq!(texts(&router), vec!["Target 2 of 2. Press E to present."]);
    }

    #[test]
    fn test_reentry_mid_play_announces_playing() {
        let router = router();
        let mut monitor = VideoTapeMonitor::default();
        monitor.poll(Some(&tape(true, 10, vec![])), &router);
        monitor.poll(None, &router);
        monitor.poll(Some(&tape(true, 90, vec![])), &router);

        let lines = texts(&router);
        assert_eq!(lines.iter().filter(|l| l.as_str() == "Playing").count(), 2);
        assert_eq!(lines.last().map(String::as_str), Some("Playing"));
    }

    #[test]
    fn test_reentry_resets_cycle() {
        let router = router();
        let mut monitor = VideoTapeMonitor::default();
        let paused = tape(false, 490, vec![target(0, 100.0, true), target(1, 300.0, true)]);
        let mut cursor = SimulatedCursor::default();
        cursor.set_targets(&paused.targets);

        monitor.poll(Some(&paused), &router);
        monitor.navigate_next(Some(&paused), &mut cursor, &router);
        monitor.navigate_next(Some(&paused), &mut cursor, &router);
        assert_eq!(monitor.navigator().cycle().current_index, Some(1));

        monitor.poll(None, &router);
        monitor.poll(Some(&paused), &router);
        assert_eq!(monitor.navigator().cycle().current_index, None);
    }
}
