//! Chapter heading detection.

use regex::Regex;
use std::sync::LazyLock;

/// Default heading pattern: `第` + CJK or Arabic numeral + `章`/`卷`.
pub const DEFAULT_CHAPTER_PATTERN: &str = r"第[一二三四五六七八九十百千万零〇0-9]+(章|卷)";

static DEFAULT_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_CHAPTER_PATTERN).expect("default chapter pattern is a valid regex")
});

/// A detected heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMarker {
    /// Full text of the heading line.
    pub title: String,
    /// Zero-based line index of the heading (inclusive chapter start).
    pub start: usize,
}

impl ChapterMarker {
    /// Create a marker.
    pub fn new(title: impl Into<String>, start: usize) -> Self {
        Self {
            title: title.into(),
            start,
        }
    }
}

/// Scans normalized lines for chapter headings.
#[derive(Debug, Clone)]
pub struct ChapterIndexer {
    pattern: Regex,
}

impl ChapterIndexer {
    /// Indexer for a custom heading pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Build the marker table for a document.
    ///
    /// Markers come out in line order, so starts are strictly increasing.
    /// An empty table is legal and means the document has no headings.
    pub fn index<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ChapterMarker> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.pattern.is_match(line.as_ref()))
            .map(|(start, line)| ChapterMarker::new(line.as_ref(), start))
            .collect()
    }

    /// Whether a single line is a heading.
    pub fn is_heading(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

impl Default for ChapterIndexer {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_HEADING.clone(),
        }
    }
}
