//! One open book: current chapter, page layout and position.
//!
//! A [`ReadingSession`] is the whole mutable state of the pager. All
//! navigation happens synchronously on the caller's thread; only the
//! position write is deferred, through the shared
//! [`PositionWriter`](crate::position::PositionWriter).

use crate::model::BookRecord;
use crate::position::{PositionTracker, PositionWriter};
use crate::text::{
    chapter_start, paginate, resolve, ChapterIndexer, ChapterMarker, Document, PageLayout,
    Viewport,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Navigation failures. The session is unchanged when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Requested chapter does not exist.
    #[error("Chapter {index} is out of range (book has {count} chapters)")]
    ChapterOutOfRange {
        /// Requested ordinal.
        index: usize,
        /// Number of chapters.
        count: usize,
    },
}

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Previous page, crossing into the previous chapter from page 1.
    PageUp,
    /// Next page, crossing into the next chapter from the last page.
    PageDown,
    /// First page of the given chapter.
    JumpToChapter(usize),
}

/// Reading state of one open book.
#[derive(Debug)]
pub struct ReadingSession {
    book: BookRecord,
    document: Document,
    markers: Vec<ChapterMarker>,
    chapter: Option<usize>,
    chapter_title: String,
    body: String,
    viewport: Viewport,
    layout: PageLayout,
    page: usize,
    tracker: PositionTracker,
}

impl ReadingSession {
    /// Index `document`, then show the page holding the book's stored
    /// position.
    pub fn open(
        book: BookRecord,
        document: Document,
        indexer: &ChapterIndexer,
        viewport: Viewport,
        writer: Arc<PositionWriter>,
    ) -> Self {
        let markers = indexer.index(document.lines());
        let tracker = PositionTracker::new(
            book.title.clone(),
            document.len(),
            book.last_position,
            writer,
        );
        let position = tracker.current();
        debug!(
            title = %book.title,
            lines = document.len(),
            chapters = markers.len(),
            position,
            "Opening book"
        );

        let mut session = Self {
            book,
            document,
            markers,
            chapter: None,
            chapter_title: String::new(),
            body: String::new(),
            viewport,
            layout: paginate("", viewport, None),
            page: 1,
            tracker,
        };
        session.enter(position);
        session
    }

    /// Apply a navigation request.
    ///
    /// # Errors
    ///
    /// [`SessionError::ChapterOutOfRange`] for a jump past the last chapter.
    pub fn navigate(&mut self, navigation: Navigation) -> Result<(), SessionError> {
        match navigation {
            Navigation::PageDown => self.page_down(),
            Navigation::PageUp => self.page_up(),
            Navigation::JumpToChapter(index) => {
                let count = self.markers.len();
                if index >= count {
                    return Err(SessionError::ChapterOutOfRange { index, count });
                }
                self.enter(self.markers[index].start);
            }
        }
        Ok(())
    }

    /// Re-layout the current chapter for a new viewport, keeping the
    /// current position on screen.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let resume = self.resume_offset(self.tracker.current());
        self.lay_out(resume);
        debug!(
            width = viewport.width,
            height = viewport.height,
            page = self.page,
            total = self.layout.total_pages(),
            "Re-laid out chapter"
        );
    }

    fn page_down(&mut self) {
        if self.page < self.layout.total_pages() {
            self.page += 1;
            self.record_page();
            return;
        }
        let next = self.chapter.map_or(0, |index| index + 1);
        if next < self.markers.len() {
            self.enter(self.markers[next].start);
        }
    }

    fn page_up(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.record_page();
            return;
        }
        let start = self.current_chapter_start();
        if start > 0 {
            let position = start - 1;
            self.load_chapter(position);
            // Equal to the previous body's length: past its end, so the
            // layout lands on the last page however the lines wrap.
            let resume = position.saturating_sub(self.current_chapter_start());
            self.show(position, resume);
        }
    }

    /// Switch to the chapter containing `position` and show the page that
    /// holds it.
    fn enter(&mut self, position: usize) {
        self.load_chapter(position);
        let resume = self.resume_offset(position);
        self.show(position, resume);
    }

    fn load_chapter(&mut self, position: usize) {
        let resolved = resolve(self.document.lines(), &self.markers, position);
        self.chapter = resolved.index;
        self.chapter_title = resolved.title.to_string();
        self.body = resolved.body();
    }

    /// Lay out the loaded chapter at `resume` and record `position`.
    fn show(&mut self, position: usize, resume: usize) {
        self.lay_out(resume);
        let recorded = self.tracker.record(position);
        debug!(
            chapter = ?self.chapter,
            page = self.page,
            total = self.layout.total_pages(),
            position = recorded,
            "Entered chapter"
        );
    }

    /// Offset of `position` within the current body.
    ///
    /// Recorded positions point at the last line of a page, so one line is
    /// taken off to land on that page rather than the next.
    fn resume_offset(&self, position: usize) -> usize {
        position
            .saturating_sub(self.current_chapter_start())
            .saturating_sub(1)
    }

    /// Re-paginate the body and move to the page where line `resume` of
    /// the body starts.
    fn lay_out(&mut self, resume: usize) {
        self.layout = paginate(&self.body, self.viewport, Some(resume));
        self.page = self.layout.page_of_line(resume);
    }

    fn record_page(&mut self) {
        let offset = self.current_chapter_start() + self.layout.offsets().offset_for(self.page);
        let recorded = self.tracker.record(offset);
        debug!(page = self.page, position = recorded, "Turned page");
    }

    fn current_chapter_start(&self) -> usize {
        chapter_start(&self.markers, self.document.len(), self.chapter)
    }

    /// Catalog record the session was opened from.
    pub fn book(&self) -> &BookRecord {
        &self.book
    }

    /// Book title.
    pub fn title(&self) -> &str {
        self.book.title.as_str()
    }

    /// Heading of the current chapter, empty before the first chapter.
    pub fn chapter_title(&self) -> &str {
        &self.chapter_title
    }

    /// Current chapter ordinal, `None` before the first chapter.
    pub fn chapter_index(&self) -> Option<usize> {
        self.chapter
    }

    /// Table of contents.
    pub fn chapters(&self) -> &[ChapterMarker] {
        &self.markers
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Pages in the current chapter.
    pub fn total_pages(&self) -> usize {
        self.layout.total_pages()
    }

    /// Lines of the current page.
    pub fn page_lines(&self) -> &[String] {
        self.layout.page_lines(self.page)
    }

    /// Text of the current page.
    pub fn page_text(&self) -> String {
        self.layout.page_text(self.page)
    }

    /// Absolute line offset last recorded.
    pub fn position(&self) -> usize {
        self.tracker.current()
    }

    /// Reading progress in percent.
    pub fn progress(&self) -> u8 {
        self.tracker.progress()
    }

    /// Viewport the current layout was built for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current chapter layout.
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Persist the current position now.
    pub fn flush_position(&self) {
        self.tracker.flush();
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
