//! Position → chapter resolution.
//!
//! Chapters are half-open intervals `[marker.start, next.start)` over one
//! shared line buffer; the last chapter runs to the end of the document.
//! Lines before the first heading form the pre-chapter region, reported as
//! chapter `None`.

use super::chapters::ChapterMarker;

/// A chapter located by [`resolve`], borrowing from the document buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedChapter<'a> {
    /// Heading text, empty for the pre-chapter region.
    pub title: &'a str,
    /// Body lines (heading excluded).
    pub lines: &'a [String],
    /// Ordinal of the chapter, `None` for the pre-chapter region.
    pub index: Option<usize>,
}

impl ResolvedChapter<'_> {
    /// Body lines joined by newlines.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// Find the chapter containing `position`.
///
/// - No markers: pre-chapter region with an empty body.
/// - `position` before the first heading: pre-chapter region, body
///   `lines[0 .. first.start - 1]` (the line right before the heading is
///   left out).
/// - Otherwise the chapter whose interval contains `position`, body
///   `lines[start + 1 .. next.start]`, empty when that range is empty.
pub fn resolve<'a>(
    lines: &'a [String],
    markers: &'a [ChapterMarker],
    position: usize,
) -> ResolvedChapter<'a> {
    let Some(first) = markers.first() else {
        return ResolvedChapter {
            title: "",
            lines: &lines[..0],
            index: None,
        };
    };

    if position < first.start {
        let end = first.start.saturating_sub(1).min(lines.len());
        return ResolvedChapter {
            title: "",
            lines: &lines[..end],
            index: None,
        };
    }

    // Markers are strictly increasing, so the enclosing chapter is the last
    // one starting at or before `position`.
    let index = markers.partition_point(|m| m.start <= position) - 1;
    let marker = &markers[index];
    let end = markers
        .get(index + 1)
        .map_or(lines.len(), |next| next.start)
        .min(lines.len());
    let start = (marker.start + 1).min(end);

    ResolvedChapter {
        title: &marker.title,
        lines: &lines[start..end],
        index: Some(index),
    }
}

/// First line of chapter `index`.
///
/// `None` (the pre-chapter region) starts at 0; an index past the last
/// marker yields `line_count` as an end sentinel.
pub fn chapter_start(markers: &[ChapterMarker], line_count: usize, index: Option<usize>) -> usize {
    match index {
        None => 0,
        Some(i) => markers.get(i).map_or(line_count, |m| m.start),
    }
}
