//! Text pipeline over a normalized document (pure).
//!
//! - [`chapters`]: heading detection → [`ChapterMarker`] table
//! - [`resolver`]: absolute line offset → enclosing chapter view
//! - [`pagination`]: chapter body → uniform pages + page/offset map

pub mod chapters;
pub mod pagination;
pub mod resolver;

pub use chapters::{ChapterIndexer, ChapterMarker, DEFAULT_CHAPTER_PATTERN};
pub use pagination::{paginate, wrap_line, PageLayout, PageOffsetMap, Viewport};
pub use resolver::{chapter_start, resolve, ResolvedChapter};

use std::sync::Arc;

/// Normalized lines of one opened book.
///
/// The buffer is immutable and cheaply cloneable; chapters are borrowed
/// slices of it rather than copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Arc<[String]>,
}

impl Document {
    /// Wrap already-normalized lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<String>> for Document {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let doc = Document::new(vec!["a".to_string(), "b".to_string()]);
        let copy = doc.clone();
        assert!(std::ptr::eq(doc.lines().as_ptr(), copy.lines().as_ptr()));
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn empty_document_reports_empty() {
        assert!(Document::new(Vec::new()).is_empty());
    }
}
