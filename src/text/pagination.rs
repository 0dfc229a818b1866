//! Page layout engine.
//!
//! Reflows a chapter body into uniform pages for a viewport and records, for
//! every page, how many logical (source) lines have been reached by the end of
//! that page. Layout is a pure function of `(body, viewport)`; a resize simply
//! lays the body out again.
//!
//! # Algorithm
//! 1. Split the body on `\n` into logical lines (an empty body has none).
//! 2. Wrap each logical line greedily at `width - 2` display columns.
//! 3. Whenever the physical line count hits a multiple of `height`, record
//!    `page -> logical index + 1`.
//! 4. Pad with blank lines to a whole number of pages (at least one).
//! 5. The final page maps to the logical line count.

use std::collections::BTreeMap;
use unicode_width::UnicodeWidthChar;

/// Columns kept free on the right edge of the viewport.
pub const WRAP_MARGIN: usize = 2;

/// Viewport size in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Width in terminal columns.
    pub width: u16,
    /// Height in terminal rows (lines per page).
    pub height: u16,
}

impl Viewport {
    /// Create new viewport dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Lines per page, never zero.
    pub fn page_height(&self) -> usize {
        usize::from(self.height.max(1))
    }

    /// Display columns available to a physical line, never zero.
    pub fn wrap_width(&self) -> usize {
        usize::from(self.width).saturating_sub(WRAP_MARGIN).max(1)
    }
}

/// Page number (1-based) → logical lines reached by the end of that page.
///
/// Always holds entries for page 1 and the final page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOffsetMap(BTreeMap<usize, usize>);

impl PageOffsetMap {
    /// Recorded entry for `page`, if any.
    pub fn get(&self, page: usize) -> Option<usize> {
        self.0.get(&page).copied()
    }

    /// Entry for `page`, falling back to the nearest preceding recorded page
    /// (0 when nothing precedes it).
    pub fn offset_for(&self, page: usize) -> usize {
        self.0
            .range(..=page)
            .next_back()
            .map_or(0, |(_, offset)| *offset)
    }

    /// Number of recorded pages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(page, offset)` pairs in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(page, offset)| (*page, *offset))
    }

    fn record(&mut self, page: usize, offset: usize) {
        self.0.insert(page, offset);
    }
}

impl FromIterator<(usize, usize)> for PageOffsetMap {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A chapter body laid out into pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    lines: Vec<String>,
    page_height: usize,
    total_pages: usize,
    logical_lines: usize,
    offsets: PageOffsetMap,
    target_page: Option<usize>,
}

impl PageLayout {
    /// Number of pages (≥ 1).
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Lines per page.
    pub fn page_height(&self) -> usize {
        self.page_height
    }

    /// Logical lines in the source body.
    pub fn logical_line_count(&self) -> usize {
        self.logical_lines
    }

    /// Physical (wrapped and padded) lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whole reflowed text, pages back to back.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// The page → offset map.
    pub fn offsets(&self) -> &PageOffsetMap {
        &self.offsets
    }

    /// Page to show first when a resume offset was given.
    pub fn target_page(&self) -> Option<usize> {
        self.target_page
    }

    /// Page on which logical line `line` starts, or the last page when
    /// `line` is past the end of the body.
    ///
    /// Agrees with [`target_page`](Self::target_page) as long as no line
    /// wraps; with wrapping it follows the recorded page boundaries instead
    /// of counting logical lines.
    pub fn page_of_line(&self, line: usize) -> usize {
        self.offsets
            .iter()
            .find(|&(_, reached)| reached > line)
            .map_or(self.total_pages, |(page, _)| page)
    }

    /// Physical lines of `page` (1-based). Out-of-range pages are empty.
    pub fn page_lines(&self, page: usize) -> &[String] {
        if page == 0 || page > self.total_pages {
            return &[];
        }
        let start = (page - 1) * self.page_height;
        &self.lines[start..start + self.page_height]
    }

    /// Text of `page` (1-based), lines joined by newlines.
    pub fn page_text(&self, page: usize) -> String {
        self.page_lines(page).join("\n")
    }
}

/// Lay out `body` for `viewport`.
///
/// `resume` is an offset in logical lines relative to the start of the body.
/// When given, [`PageLayout::target_page`] is `floor(resume / height) + 1`,
/// or the last page when `resume` is past the end.
///
/// ```
/// use txtreader::text::{paginate, Viewport};
///
/// let layout = paginate("L1\nL2\nL3\nL4\nL5", Viewport::new(80, 2), None);
/// assert_eq!(layout.total_pages(), 3);
/// assert_eq!(layout.offsets().get(2), Some(4));
/// assert_eq!(layout.offsets().get(3), Some(5));
/// ```
pub fn paginate(body: &str, viewport: Viewport, resume: Option<usize>) -> PageLayout {
    let height = viewport.page_height();
    let wrap_width = viewport.wrap_width();

    let logical: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split('\n').collect()
    };

    let mut lines = Vec::with_capacity(logical.len());
    let mut offsets = PageOffsetMap::default();
    for (index, line) in logical.iter().enumerate() {
        for segment in wrap_line(line, wrap_width) {
            lines.push(segment.to_string());
            if lines.len() % height == 0 {
                offsets.record(lines.len() / height, index + 1);
            }
        }
    }

    let total_pages = lines.len().div_ceil(height).max(1);
    lines.resize(total_pages * height, String::new());
    offsets.record(total_pages, logical.len());

    let target_page = resume.map(|offset| {
        if offset < logical.len() {
            (offset / height + 1).min(total_pages)
        } else {
            total_pages
        }
    });

    PageLayout {
        lines,
        page_height: height,
        total_pages,
        logical_lines: logical.len(),
        offsets,
        target_page,
    }
}

/// Split `line` into pieces no wider than `max_width` display columns.
///
/// Cuts greedily at the longest prefix that fits. A glyph wider than
/// `max_width` on its own still gets a piece, so every call makes progress.
/// A line that already fits comes back unchanged as a single piece.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut piece_width = 0;

    for (index, ch) in line.char_indices() {
        let width = ch.width().unwrap_or(0);
        if piece_width + width > max_width && index > piece_start {
            pieces.push(&line[piece_start..index]);
            piece_start = index;
            piece_width = 0;
        }
        piece_width += width;
    }
    pieces.push(&line[piece_start..]);
    pieces
}

/// Display width of `text`, summing per-glyph widths as [`wrap_line`] does.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
