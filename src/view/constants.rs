//! Layout dimension constants for the reading screen.

use crate::text::Viewport;

/// Height of the header (book and chapter title).
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the footer (page counter, progress, key hints or notice).
pub const FOOTER_HEIGHT: u16 = 1;

/// Rows taken by everything except the page body.
pub const CHROME_HEIGHT: u16 = HEADER_HEIGHT + FOOTER_HEIGHT;

/// Width used when the terminal reports zero columns.
pub const FALLBACK_WIDTH: u16 = 80;

/// Page viewport for a terminal of `width` × `height` cells.
///
/// The body gets the rows left after the chrome; wrapping reserves its own
/// margin inside that width.
pub fn page_viewport(width: u16, height: u16) -> Viewport {
    let width = if width > 0 { width } else { FALLBACK_WIDTH };
    Viewport::new(width, height.saturating_sub(CHROME_HEIGHT).max(1))
}
