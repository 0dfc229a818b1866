//! Domain-level reader actions independent of key bindings.

/// Actions the pager understands.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `ReaderAction` is handled by
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderAction {
    /// Next page, or the first page of the next chapter. Default: →/l/Space/PageDown
    PageDown,
    /// Previous page, or the last page of the previous chapter. Default: ←/h/PageUp
    PageUp,
    /// Jump to the start of the next chapter. Default: ]
    NextChapter,
    /// Jump to the start of the previous chapter. Default: [
    PrevChapter,
    /// Append a digit to the chapter number being typed. Default: 0-9
    ChapterDigit(u8),
    /// Remove the last typed digit. Default: Backspace
    EraseDigit,
    /// Jump to the typed chapter number, or dismiss the notification line
    /// when nothing was typed. Default: Enter
    Confirm,
    /// Leave the reader. Default: q/Esc/Ctrl+C
    Quit,
}
