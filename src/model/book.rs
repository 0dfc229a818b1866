//! Catalog records and reading progress.

use super::identifiers::BookTitle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One imported book as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Unique title, also the artifact name.
    pub title: BookTitle,
    /// Number of normalized lines; fixed at import.
    pub length: usize,
    /// Absolute line offset where the reader stopped, in `[0, length - 1]`.
    #[serde(default)]
    pub last_position: usize,
    /// When the book was imported.
    pub created_at: DateTime<Utc>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
}

impl BookRecord {
    /// Fresh record positioned at the first line.
    pub fn new(title: BookTitle, length: usize) -> Self {
        let now = Utc::now();
        Self {
            title,
            length,
            last_position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Highest valid line offset for this book.
    pub fn last_line(&self) -> usize {
        self.length.saturating_sub(1)
    }

    /// Reading progress in percent.
    pub fn progress(&self) -> u8 {
        progress_percent(self.last_position, self.length)
    }
}

/// `position * 100 / (length - 1)`, clamped to `[0, 100]`.
///
/// A book with a single line (or none) has nowhere to progress to and
/// reports 0.
///
/// ```
/// use txtreader::model::progress_percent;
///
/// assert_eq!(progress_percent(0, 101), 0);
/// assert_eq!(progress_percent(50, 101), 50);
/// assert_eq!(progress_percent(500, 101), 100);
/// assert_eq!(progress_percent(0, 1), 0);
/// ```
pub fn progress_percent(position: usize, length: usize) -> u8 {
    let Some(span) = length.checked_sub(1).filter(|span| *span > 0) else {
        return 0;
    };
    let percent = (position as u128 * 100) / span as u128;
    percent.min(100) as u8
}

/// Row shown in a library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    /// Book title.
    pub title: BookTitle,
    /// Normalized line count.
    pub length: usize,
    /// Stored resume offset.
    pub last_position: usize,
    /// Progress in percent.
    pub progress: u8,
}

impl From<&BookRecord> for BookSummary {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.title.clone(),
            length: record.length,
            last_position: record.last_position,
            progress: record.progress(),
        }
    }
}
