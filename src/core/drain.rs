//! Drain loop: the single consumer of the announcement queue
//!
//! Two-speed wait:
//! - item delivered (or failed) → wait the full drain interval
//! - queue empty → wake on the next enqueue or idle tick, whichever comes first

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::queue::QueueHandle;
use crate::core::sink::DeliverySink;
use crate::{Result, DRAIN_INTERVAL_MS, IDLE_TICK_MS};

/// Drain loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Wait after each delivery attempt (milliseconds)
    pub drain_interval_ms: u64,
    /// Re-poll delay while idle (milliseconds)
    pub idle_tick_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drain_interval_ms: DRAIN_INTERVAL_MS,
            idle_tick_ms: IDLE_TICK_MS,
        }
    }
}

impl PipelineConfig {
    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }

    pub fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms.max(1))
    }
}

/// Delivery counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrainStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Pops one announcement at a time and hands it to the sink
pub struct DrainLoop<S: DeliverySink> {
    queue: QueueHandle,
    sink: S,
    config: PipelineConfig,
    stats: DrainStats,
}

impl<S: DeliverySink + 'static> DrainLoop<S> {
    pub fn new(queue: QueueHandle, sink: S, config: PipelineConfig) -> Self {
        Self {
            queue,
            sink,
            config,
            stats: DrainStats::default(),
        }
    }

    /// Try one delivery. Returns whether an item was taken off the queue.
    ///
    /// A failed delivery is logged and dropped, never retried. A panicking sink counts
    /// as a failed delivery.
    pub fn drain_once(&mut self) -> bool {
        let Some(announcement) = self.queue.dequeue() else {
            return false;
        };
        let sink = &mut self.sink;
        match catch_unwind(AssertUnwindSafe(|| sink.send(&announcement))) {
            Ok(Ok(())) => {
                self.stats.delivered += 1;
                debug!(category = %announcement.category(), text = announcement.text(), "delivered");
            }
            Ok(Err(e)) => {
                self.stats.failed += 1;
                warn!(category = %announcement.category(), error = %e, "delivery failed, dropping announcement");
            }
            Err(payload) => {
                self.stats.failed += 1;
                warn!(
                    category = %announcement.category(),
                    panic = panic_message(&*payload),
                    "sink panicked, dropping announcement"
                );
            }
        }
        true
    }

    pub fn stats(&self) -> DrainStats {
        self.stats
    }

    /// Run until `shutdown` flips to true or its sender is dropped
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> (S, DrainStats) {
        let interval = self.config.drain_interval();
        let idle = self.config.idle_tick();
        info!(interval_ms = self.config.drain_interval_ms, "drain loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            if self.drain_once() {
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = shutdown.changed() => break,
                }
            } else {
                tokio::select! {
                    _ = self.queue.ready() => {}
                    _ = sleep(idle) => {}
                    _ = shutdown.changed() => break,
                }
            }
        }

        info!(delivered = self.stats.delivered, failed = self.stats.failed, "drain loop stopped");
        (self.sink, self.stats)
    }

    /// Spawn on the current tokio runtime
    pub fn spawn(self) -> DrainHandle<S> {
        let (stop, shutdown) = watch::channel(false);
        let join = tokio::spawn(self.run(shutdown));
        DrainHandle { stop, join }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Running drain loop
pub struct DrainHandle<S> {
    stop: watch::Sender<bool>,
    join: JoinHandle<(S, DrainStats)>,
}

impl<S> DrainHandle<S> {
    /// The task has exited and will deliver nothing more
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the loop and get the sink back. Anything still queued stays queued.
    pub async fn stop(self) -> Result<(S, DrainStats)> {
        let _ = self.stop.send(true);
        Ok(self.join.await?)
    }

    /// Wait for `queue` to empty, checking every `poll`, then stop. Returns early if
    /// the task has already exited.
    pub async fn finish(self, queue: &QueueHandle, poll: Duration) -> Result<(S, DrainStats)> {
        while !queue.is_empty() && !self.is_finished() {
            sleep(poll).await;
        }
        self.stop().await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sink::RecordingSink;
    use crate::types::{Announcement, Category};

    #[test]
    fn test_drain_once_on_empty_queue() {
        let queue = QueueHandle::new();
        let mut drain = DrainLoop::new(queue, RecordingSink::new(), PipelineConfig::default());
        assert!(!drain.drain_once());
        assert_eq!(drain.stats(), DrainStats::default());
    }

    #[test]
    fn test_failed_delivery_is_dropped() {
        let queue = QueueHandle::new();
        queue.enqueue("first", Category::Menu);
        queue.enqueue("second", Category::Menu);
        let sink = RecordingSink::rejecting(vec![1]);
        let mut drain = DrainLoop::new(queue.clone(), sink.clone(), PipelineConfig::default());

        assert!(drain.drain_once());
        assert!(drain.drain_once());
        assert!(!drain.drain_once());

        assert_eq!(sink.texts(), vec!["second"]);
        assert_eq!(drain.stats(), DrainStats { delivered: 1, failed: 1 });
        assert!(queue.is_empty());
    }

    /// Panics on the given delivery attempts (1-based), records the rest
    struct PanickingSink {
        panic_on: u64,
        attempts: u64,
        delivered: Vec<String>,
    }

    impl DeliverySink for PanickingSink {
        fn send(&mut self, announcement: &Announcement) -> Result<()> {
            self.attempts += 1;
            if self.attempts == self.panic_on {
                panic!("speech bridge threw on {}", announcement.text());
            }
            self.delivered.push(announcement.text().to_string());
            Ok(())
        }
    }

    #[test]
    fn test_panicking_sink_counts_as_failure() {
        let queue = QueueHandle::new();
        queue.enqueue("one", Category::Dialogue);
        queue.enqueue("two", Category::Dialogue);
        let sink = PanickingSink {
            panic_on: 1,
            attempts: 0,
            delivered: Vec::new(),
        };
        let mut drain = DrainLoop::new(queue.clone(), sink, PipelineConfig::default());

        assert!(drain.drain_once());
        assert!(drain.drain_once());
        assert!(!drain.drain_once());
        assert_eq!(drain.stats(), DrainStats { delivered: 1, failed: 1 });
        assert_eq!(drain.sink.delivered, vec!["two"]);
    }

    #[test]
    fn test_panic_message_payloads() {
        let text: Box<dyn Any + Send> = Box::new("bridge threw");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bridge gone"));
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*text), "bridge threw");
        assert_eq!(panic_message(&*owned), "bridge gone");
        assert_eq!(panic_message(&*other), "non-string panic payload");
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_returns_when_task_is_gone() {
        let queue = QueueHandle::new();
        let handle = DrainLoop::new(queue.clone(), RecordingSink::new(), PipelineConfig::default()).spawn();
        handle.stop.send(true).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert!(handle.is_finished());

        queue.enqueue("never delivered", Category::SystemMessage);
        let (_, stats) = handle.finish(&queue, Duration::from_millis(25)).await.unwrap();
        assert_eq!(stats, DrainStats::default());
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_waits_for_pending_items() {
        let queue = QueueHandle::new();
        let sink = RecordingSink::new();
        let handle = DrainLoop::new(queue.clone(), sink.clone(), PipelineConfig::default()).spawn();
        for text in ["a", "b", "c"] {
            queue.enqueue(text, Category::Menu);
        }

        let (_, stats) = handle.finish(&queue, Duration::from_millis(25)).await.unwrap();
        assert_eq!(stats.delivered, 3);
        assert_eq!(sink.texts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_default_config_matches_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.drain_interval(), Duration::from_millis(DRAIN_INTERVAL_MS));
        assert_eq!(config.idle_tick(), Duration::from_millis(IDLE_TICK_MS));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PipelineConfig = serde_json::from_str(r#"{"drain_interval_ms": 50}"#).unwrap();
        assert_eq!(config.drain_interval_ms, 50);
        assert_eq!(config.idle_tick_ms, IDLE_TICK_MS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_delivers_and_stops() {
        let queue = QueueHandle::new();
        let sink = RecordingSink::new();
        let handle = DrainLoop::new(queue.clone(), sink.clone(), PipelineConfig::default()).spawn();

        queue.enqueue("Menu: Examine (1 of 4)", Category::Menu);
        queue.enqueue("Move", Category::Menu);
        sleep(Duration::from_millis(200)).await;

        let (_, stats) = handle.stop().await.unwrap();
        assert_eq!(stats.delivered, 2);
        assert_eq!(sink.texts(), vec!["Menu: Examine (1 of 4)", "Move"]);
    }
}
