//! Delivery sinks: where drained announcements end up
//!
//! A sink is a thin bridge to a screen reader, TTS engine or terminal. It may fail; the
//! drain loop logs the failure and moves on.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{Announcement, DeliveredLine};
use crate::{NarratorError, Result};

/// Receives announcements one at a time from the drain loop
pub trait DeliverySink: Send {
    fn send(&mut self, announcement: &Announcement) -> Result<()>;
}

/// How a console sink renders each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colored, timestamped
    Terminal,
    /// `seq=.. | category=.. | text=..`
    Plain,
    /// One JSON object per line
    Json,
}

/// Writes delivered lines to stdout (or any writer)
pub struct ConsoleSink {
    mode: OutputMode,
    writer: Box<dyn Write + Send>,
    sequence: u64,
}

impl ConsoleSink {
    pub fn stdout(mode: OutputMode) -> Self {
        Self::new(mode, Box::new(std::io::stdout()))
    }

    pub fn new(mode: OutputMode, writer: Box<dyn Write + Send>) -> Self {
        Self {
            mode,
            writer,
            sequence: 0,
        }
    }
}

impl DeliverySink for ConsoleSink {
    fn send(&mut self, announcement: &Announcement) -> Result<()> {
        self.sequence += 1;
        let line = DeliveredLine::new(announcement, self.sequence);
        let rendered = match self.mode {
            OutputMode::Terminal => line.to_terminal_string(),
            OutputMode::Plain => line.to_parseable_string(),
            OutputMode::Json => serde_json::to_string(&line)?,
        };
        writeln!(self.writer, "{}", rendered)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every delivered announcement in memory; optionally rejects chosen deliveries
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<Announcement>>>,
    attempts: Arc<Mutex<u64>>,
    reject_attempts: Vec<u64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given delivery attempts (1-based)
    pub fn rejecting(attempts: impl Into<Vec<u64>>) -> Self {
        Self {
            reject_attempts: attempts.into(),
            ..Self::default()
        }
    }

    /// Texts delivered so far, in order
    pub fn texts(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|a| a.text().to_string())
            .collect()
    }

    pub fn delivered(&self) -> Vec<Announcement> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Delivery attempts, successful or not
    pub fn attempts(&self) -> u64 {
        *self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeliverySink for RecordingSink {
    fn send(&mut self, announcement: &Announcement) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);
            *attempts += 1;
            *attempts
        };
        if self.reject_attempts.contains(&attempt) {
            return Err(NarratorError::Sink(format!(
                "attempt {} rejected: {}",
                attempt,
                announcement.text()
            )));
        }
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(announcement.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_console_output() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(OutputMode::Plain, Box::new(buf.clone()));
        sink.send(&Announcement::new("Examine", Category::Menu)).unwrap();
        sink.send(&Announcement::new("Talk", Category::Menu)).unwrap();

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            out,
            "seq=1 | category=menu | text=Examine\nseq=2 | category=menu | text=Talk\n"
        );
    }

    #[test]
    fn test_json_console_output_parses() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::new(OutputMode::Json, Box::new(buf.clone()));
        sink.send(&Announcement::new("Playing", Category::Investigation)).unwrap();

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let line: DeliveredLine = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(line.text, "Playing");
        assert_eq!(line.category, Category::Investigation);
        assert_eq!(line.sequence, 1);
    }

    #[test]
    fn test_recording_sink_rejects_chosen_attempts() {
        let mut sink = RecordingSink::rejecting(vec![2]);
        assert!(sink.send(&Announcement::new("a", Category::Menu)).is_ok());
        assert!(sink.send(&Announcement::new("b", Category::Menu)).is_err());
        assert!(sink.send(&Announcement::new("c", Category::Menu)).is_ok());
        assert_eq!(sink.texts(), vec!["a", "c"]);
        assert_eq!(sink.attempts(), 3);
    }
}
