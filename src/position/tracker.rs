//! In-memory reading position with deferred persistence.

use super::debounce::DebouncedWriter;
use crate::library::Catalog;
use crate::model::{progress_percent, BookTitle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One position write destined for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    /// Book being read.
    pub title: BookTitle,
    /// Absolute line offset.
    pub offset: usize,
}

/// Debounced writer of position updates.
pub type PositionWriter = DebouncedWriter<PositionUpdate>;

/// Spawn a writer that persists updates into `catalog`.
///
/// Failed writes are logged and dropped; the next navigation supersedes
/// them.
pub fn spawn_position_writer(
    catalog: Arc<dyn Catalog>,
    window: Duration,
) -> std::io::Result<PositionWriter> {
    DebouncedWriter::spawn(window, move |update: PositionUpdate| {
        match catalog.update_last_position(&update.title, update.offset) {
            Ok(()) => debug!(title = %update.title, offset = update.offset, "Persisted position"),
            Err(err) => warn!(title = %update.title, error = %err, "Failed to persist position"),
        }
    })
}

/// Current reading position of one open book.
#[derive(Debug)]
pub struct PositionTracker {
    title: BookTitle,
    length: usize,
    current: usize,
    writer: Arc<PositionWriter>,
}

impl PositionTracker {
    /// Tracker starting at `initial`, clamped into the book.
    pub fn new(title: BookTitle, length: usize, initial: usize, writer: Arc<PositionWriter>) -> Self {
        Self {
            current: clamp(initial, length),
            title,
            length,
            writer,
        }
    }

    /// Move to `offset` (clamped to `[0, length - 1]`) and schedule a write.
    ///
    /// Returns the stored offset.
    pub fn record(&mut self, offset: usize) -> usize {
        self.current = clamp(offset, self.length);
        self.writer.submit(PositionUpdate {
            title: self.title.clone(),
            offset: self.current,
        });
        self.current
    }

    /// Current absolute offset.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Book being tracked.
    pub fn title(&self) -> &BookTitle {
        &self.title
    }

    /// Book length in lines.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Progress in percent.
    pub fn progress(&self) -> u8 {
        progress_percent(self.current, self.length)
    }

    /// Persist any pending write now.
    pub fn flush(&self) {
        self.writer.flush();
    }
}

impl Drop for PositionTracker {
    fn drop(&mut self) {
        self.writer.flush();
    }
}

fn clamp(offset: usize, length: usize) -> usize {
    offset.min(length.saturating_sub(1))
}
