//! Tests for chapter-crossing navigation and resume behavior.

use super::*;
use crate::library::{Catalog, MemoryCatalog};
use crate::model::BookTitle;
use crate::position::spawn_position_writer;
use proptest::prelude::*;
use std::time::Duration;

// ===== Fixtures =====

/// 21 lines: a three-line preface, an excluded separator line, then two
/// chapters with 10 and 5 body lines.
fn book_lines() -> Vec<String> {
    let mut lines = vec![
        "前言".to_string(),
        "序文一".to_string(),
        "序文二".to_string(),
        "——".to_string(),
        "第一章 开始".to_string(),
    ];
    lines.extend((0..10).map(|i| format!("一-{i}")));
    lines.push("第二章 继续".to_string());
    lines.extend((0..5).map(|i| format!("二-{i}")));
    lines
}

/// Two chapters of four 26-column lines each; every line wraps into three
/// rows at a wrap width of 10.
fn wrapped_lines() -> Vec<String> {
    let mut lines = vec!["第1章 甲".to_string()];
    lines.extend((0..4).map(|i| format!("{i}{}", "x".repeat(25))));
    lines.push("第2章 乙".to_string());
    lines.extend((0..4).map(|i| format!("{i}{}", "y".repeat(25))));
    lines
}

fn open_at(position: usize, viewport: Viewport) -> (Arc<MemoryCatalog>, ReadingSession) {
    open_book(book_lines(), position, viewport)
}

fn open_book(
    lines: Vec<String>,
    position: usize,
    viewport: Viewport,
) -> (Arc<MemoryCatalog>, ReadingSession) {
    let catalog = Arc::new(MemoryCatalog::default());
    let title = BookTitle::new("测试").unwrap();
    catalog.create(&title, lines.len()).unwrap();
    catalog.update_last_position(&title, position).unwrap();
    let record = catalog.get_by_title(&title).unwrap();

    let writer = Arc::new(spawn_position_writer(catalog.clone(), Duration::from_secs(60)).unwrap());
    let session = ReadingSession::open(
        record,
        Document::new(lines),
        &ChapterIndexer::default(),
        viewport,
        writer,
    );
    (catalog, session)
}

fn tall() -> Viewport {
    Viewport::new(80, 4)
}

// ===== Opening =====

#[test]
fn opens_in_preface_at_line_zero() {
    let (_catalog, session) = open_at(0, tall());
    assert_eq!(session.chapter_index(), None);
    assert_eq!(session.chapter_title(), "");
    assert_eq!(session.page(), 1);
    assert_eq!(session.total_pages(), 1);
    assert_eq!(session.page_lines(), ["前言", "序文一", "序文二", ""]);
    assert_eq!(session.chapters().len(), 2);
}

#[test]
fn reopening_lands_on_the_recorded_page() {
    for (position, page) in [(4, 1), (8, 1), (12, 2), (14, 3)] {
        let (_catalog, session) = open_at(position, tall());
        assert_eq!(session.chapter_index(), Some(0), "position {position}");
        assert_eq!(session.page(), page, "position {position}");
    }
}

#[test]
fn last_line_resumes_on_final_page() {
    let (_catalog, session) = open_at(20, tall());
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 20);
    assert_eq!(session.progress(), 100);
}

// ===== Page turns =====

#[test]
fn page_down_walks_through_chapters() {
    let (_catalog, mut session) = open_at(0, tall());

    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!(session.chapter_title(), "第一章 开始");
    assert_eq!((session.page(), session.total_pages()), (1, 3));
    assert_eq!(session.position(), 4);

    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 12);

    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.page(), 3);
    assert_eq!(session.position(), 14);
    assert_eq!(session.page_lines(), ["一-8", "一-9", "", ""]);

    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!((session.page(), session.total_pages()), (1, 2));
    assert_eq!(session.position(), 15);

    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 20);
}

#[test]
fn page_down_at_end_of_book_is_noop() {
    let (_catalog, mut session) = open_at(20, tall());
    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 20);
}

#[test]
fn page_up_enters_previous_chapter_at_last_page() {
    let (_catalog, mut session) = open_at(15, tall());
    assert_eq!(session.chapter_index(), Some(1));

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!(session.page(), 3);
    assert_eq!(session.position(), 14);

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 12);

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.page(), 1);
    assert_eq!(session.position(), 8);

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.chapter_index(), None);
    assert_eq!(session.page(), 1);
    assert_eq!(session.position(), 3);
}

#[test]
fn page_up_at_start_of_book_is_noop() {
    let (_catalog, mut session) = open_at(0, tall());
    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.chapter_index(), None);
    assert_eq!(session.position(), 0);
}

// ===== Chapter jumps =====

#[test]
fn jump_enters_first_page_of_chapter() {
    let (_catalog, mut session) = open_at(0, tall());
    session.navigate(Navigation::JumpToChapter(1)).unwrap();
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!(session.chapter_title(), "第二章 继续");
    assert_eq!(session.page(), 1);
    assert_eq!(session.position(), 15);
}

#[test]
fn jump_out_of_range_leaves_state_unchanged() {
    let (_catalog, mut session) = open_at(12, tall());
    let err = session.navigate(Navigation::JumpToChapter(2)).unwrap_err();
    assert_eq!(err, SessionError::ChapterOutOfRange { index: 2, count: 2 });
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 12);
}

// ===== Resize =====

#[test]
fn resize_keeps_position_on_screen() {
    let (_catalog, mut session) = open_at(14, tall());
    assert_eq!(session.page(), 3);

    session.resize(Viewport::new(80, 2));
    assert_eq!(session.total_pages(), 5);
    assert_eq!(session.page(), 5);
    assert_eq!(session.position(), 14);

    session.resize(Viewport::new(80, 20));
    assert_eq!(session.total_pages(), 1);
    assert_eq!(session.page(), 1);
    assert_eq!(session.viewport(), Viewport::new(80, 20));
}

#[test]
fn narrow_resize_wraps_long_lines() {
    let (_catalog, mut session) = open_at(0, tall());
    session.resize(Viewport::new(4, 4));
    // Each two-glyph preface line is 4 columns wide; wrap width is 2.
    assert_eq!(session.layout().lines().len() % 4, 0);
    assert!(session.total_pages() > 1);
}

// ===== Wrapped lines =====

/// Three rows per line, two rows per page: six pages per chapter.
fn short() -> Viewport {
    Viewport::new(12, 2)
}

/// Three rows per line, four rows per page: three pages per chapter.
fn narrow() -> Viewport {
    Viewport::new(12, 4)
}

#[test]
fn page_up_into_wrapped_chapter_lands_on_last_page() {
    let (_catalog, mut session) = open_book(wrapped_lines(), 5, short());
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!((session.page(), session.total_pages()), (1, 6));

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!((session.page(), session.total_pages()), (6, 6));
    assert_eq!(session.position(), 4);
    assert_eq!(session.page_lines(), ["x".repeat(10), "x".repeat(6)]);
}

#[test]
fn wrapped_chapter_boundary_round_trip() {
    let (_catalog, mut session) = open_book(wrapped_lines(), 0, short());
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!(session.page(), 1);

    let mut positions = Vec::new();
    for _ in 0..5 {
        session.navigate(Navigation::PageDown).unwrap();
        positions.push(session.position());
    }
    assert_eq!(session.page(), 6);
    assert_eq!(positions, [2, 2, 3, 4, 4]);

    session.navigate(Navigation::PageDown).unwrap();
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!(session.page(), 1);
    assert_eq!(session.position(), 5);

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!(session.page(), 6);
    assert_eq!(session.position(), 4);

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.page(), 5);
    assert_eq!(session.position(), 4);
}

#[test]
fn reopening_wrapped_chapter_lands_on_the_recorded_page() {
    for turns in 1..=2 {
        let (catalog, mut session) = open_book(wrapped_lines(), 0, narrow());
        for _ in 0..turns {
            session.navigate(Navigation::PageDown).unwrap();
        }
        let page = session.page();
        let text = session.page_text();
        session.flush_position();
        let position = catalog.get_by_title(&session.book().title).unwrap().last_position;
        drop(session);

        let (_catalog, reopened) = open_book(wrapped_lines(), position, narrow());
        assert_eq!(reopened.chapter_index(), Some(0), "after {turns} turns");
        assert_eq!(reopened.page(), page, "after {turns} turns");
        assert_eq!(reopened.page_text(), text, "after {turns} turns");
    }
}

#[test]
fn resize_into_wrapping_then_page_up() {
    let (_catalog, mut session) = open_book(wrapped_lines(), 4, Viewport::new(80, 4));
    assert_eq!((session.page(), session.total_pages()), (1, 1));

    session.resize(narrow());
    assert_eq!((session.page(), session.total_pages()), (3, 3));
    assert_eq!(session.position(), 4);

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.page(), 2);
    assert_eq!(session.position(), 3);
}

#[test]
fn resize_into_wrapping_then_page_up_across_chapters() {
    let (_catalog, mut session) = open_book(wrapped_lines(), 5, Viewport::new(80, 4));
    session.resize(short());
    assert_eq!(session.chapter_index(), Some(1));
    assert_eq!((session.page(), session.total_pages()), (1, 6));

    session.navigate(Navigation::PageUp).unwrap();
    assert_eq!(session.chapter_index(), Some(0));
    assert_eq!((session.page(), session.total_pages()), (6, 6));
}

// ===== Persistence =====

#[test]
fn flush_persists_latest_position() {
    let (catalog, mut session) = open_at(0, tall());
    session.navigate(Navigation::PageDown).unwrap();
    session.navigate(Navigation::PageDown).unwrap();
    session.flush_position();

    let record = catalog.get_by_title(&session.book().title).unwrap();
    assert_eq!(record.last_position, 12);
}

#[test]
fn dropping_session_persists_position() {
    let (catalog, mut session) = open_at(0, tall());
    session.navigate(Navigation::JumpToChapter(1)).unwrap();
    let title = session.book().title.clone();
    drop(session);
    assert_eq!(catalog.get_by_title(&title).unwrap().last_position, 15);
}

// ===== Properties =====

fn navigation_strategy() -> impl Strategy<Value = Navigation> {
    prop_oneof![
        4 => Just(Navigation::PageDown),
        4 => Just(Navigation::PageUp),
        1 => (0usize..3).prop_map(Navigation::JumpToChapter),
    ]
}

proptest! {
    #[test]
    fn navigation_keeps_session_consistent(
        start in 0usize..21,
        height in 1u16..8,
        steps in prop::collection::vec(navigation_strategy(), 0..40),
    ) {
        let (_catalog, mut session) = open_at(start, Viewport::new(80, height));
        for step in steps {
            let _ = session.navigate(step);
            prop_assert!(session.page() >= 1);
            prop_assert!(session.page() <= session.total_pages());
            prop_assert!(session.position() < 21);
            let start = chapter_start(session.chapters(), 21, session.chapter_index());
            prop_assert!(start <= session.position());
        }
    }
}
