//! Terminal pager (impure shell around [`ReadingSession`]).

pub mod constants;
pub mod styles;

pub use constants::page_viewport;
pub use styles::{ColorConfig, ReaderStyles};

use crate::config::KeyBindings;
use crate::model::{AppError, ReaderAction};
use crate::session::{Navigation, ReadingSession, SessionError};
use crossterm::{
    event::{self, Event, KeyEvent},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<TuiError> for AppError {
    fn from(err: TuiError) -> Self {
        match err {
            TuiError::Io(err) => AppError::Terminal(err),
        }
    }
}

const KEY_HINTS: &str = "←/→ page  [/] chapter  <n>⏎ go to  q quit";

/// The reading screen.
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    session: ReadingSession,
    key_bindings: KeyBindings,
    styles: ReaderStyles,
    notice: Option<String>,
    chapter_input: Option<usize>,
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Wrap an already-initialized terminal.
    ///
    /// The session is re-laid out for the terminal's current size.
    pub fn with_terminal(
        terminal: Terminal<B>,
        mut session: ReadingSession,
        key_bindings: KeyBindings,
        styles: ReaderStyles,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        session.resize(page_viewport(size.width, size.height));
        Ok(Self {
            terminal,
            session,
            key_bindings,
            styles,
            notice: None,
            chapter_input: None,
        })
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if self.handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => self.handle_resize(width, height),
                _ => continue,
            }
            self.draw()?;
        }
    }

    /// Apply one key event. Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !KeyBindings::is_press(&key) {
            return false;
        }
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        debug!(?action, "Key action");

        let typed = self.chapter_input.take();

        let result = match action {
            ReaderAction::Quit => return true,
            ReaderAction::ChapterDigit(digit) => {
                let number = typed.unwrap_or(0);
                self.chapter_input = Some(number.saturating_mul(10).saturating_add(usize::from(digit)));
                return false;
            }
            ReaderAction::EraseDigit => {
                self.chapter_input = typed.filter(|number| *number >= 10).map(|number| number / 10);
                return false;
            }
            ReaderAction::Confirm => {
                match typed {
                    Some(number) => self.go_to_chapter(number),
                    None => self.notice = None,
                }
                return false;
            }
            ReaderAction::PageDown => self.session.navigate(Navigation::PageDown),
            ReaderAction::PageUp => self.session.navigate(Navigation::PageUp),
            ReaderAction::NextChapter => {
                let next = self.session.chapter_index().map_or(0, |index| index + 1);
                self.session.navigate(Navigation::JumpToChapter(next))
            }
            ReaderAction::PrevChapter => match self.session.chapter_index() {
                Some(index) if index > 0 => self.session.navigate(Navigation::JumpToChapter(index - 1)),
                _ => {
                    self.notice = Some("Already at the first chapter".to_string());
                    return false;
                }
            },
        };

        self.notice = match result {
            Ok(()) => None,
            Err(SessionError::ChapterOutOfRange { count, .. }) if count > 0 => {
                Some("Already at the last chapter".to_string())
            }
            Err(err) => Some(err.to_string()),
        };
        false
    }

    /// Jump to the 1-based chapter `number`, or explain why not.
    fn go_to_chapter(&mut self, number: usize) {
        let jumped = number.checked_sub(1).is_some_and(|index| {
            self.session
                .navigate(Navigation::JumpToChapter(index))
                .is_ok()
        });
        let count = self.session.chapters().len();
        self.notice = (!jumped).then(|| format!("No chapter {number} (book has {count})"));
    }

    /// Re-layout the session for a new terminal size.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "Terminal resized");
        self.session.resize(page_viewport(width, height));
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let session = &self.session;
        let styles = &self.styles;
        let prompt = self.chapter_input.map(|typed| format!("Go to chapter: {typed}"));
        let notice = prompt.as_deref().or(self.notice.as_deref());
        self.terminal
            .draw(|frame| render(frame, session, styles, notice))?;
        Ok(())
    }

    /// The session being read.
    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    /// Current notification, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Chapter number typed so far, if any.
    pub fn chapter_input(&self) -> Option<usize> {
        self.chapter_input
    }

    /// The terminal (for inspecting a test backend).
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Give the session back, e.g. to flush its position.
    pub fn into_session(self) -> ReadingSession {
        self.session
    }
}

/// Draw header, page body and footer for `session`.
pub fn render(frame: &mut Frame, session: &ReadingSession, styles: &ReaderStyles, notice: Option<&str>) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(constants::HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(constants::FOOTER_HEIGHT),
    ])
    .areas(frame.area());

    render_header(frame, header, session, styles);

    let lines: Vec<Line> = session
        .page_lines()
        .iter()
        .map(|line| Line::raw(line.as_str()))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1))),
        body,
    );

    render_footer(frame, footer, session, styles, notice);
}

fn render_header(frame: &mut Frame, area: Rect, session: &ReadingSession, styles: &ReaderStyles) {
    let mut spans = vec![Span::styled(session.title(), styles.book)];
    if !session.chapter_title().is_empty() {
        spans.push(Span::raw(" · "));
        spans.push(Span::styled(session.chapter_title(), styles.chapter));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(
    frame: &mut Frame,
    area: Rect,
    session: &ReadingSession,
    styles: &ReaderStyles,
    notice: Option<&str>,
) {
    let status = format!(
        "{}/{} · {}%  ",
        session.page(),
        session.total_pages(),
        session.progress()
    );
    let tail = match notice {
        Some(message) => Span::styled(message.to_string(), styles.notice),
        None => Span::styled(KEY_HINTS, styles.footer),
    };
    let line = Line::from(vec![Span::styled(status, styles.footer), tail]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Take over the terminal, run the pager, and restore the terminal.
///
/// The terminal is restored even when the loop fails. The session is
/// returned so the caller can flush the final position.
pub fn run_reader(
    session: ReadingSession,
    key_bindings: KeyBindings,
    styles: ReaderStyles,
) -> Result<ReadingSession, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = stdout.execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let result = start(session, key_bindings, styles).and_then(|mut app| {
        app.run()?;
        Ok(app.into_session())
    });
    restore_terminal()?;
    result
}

fn start(
    session: ReadingSession,
    key_bindings: KeyBindings,
    styles: ReaderStyles,
) -> Result<TuiApp<CrosstermBackend<Stdout>>, TuiError> {
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    TuiApp::with_terminal(terminal, session, key_bindings, styles)
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
