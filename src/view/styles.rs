//! Reading screen styling.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colors are used at all.
///
/// Disabled by the `--no-color` flag or a `NO_COLOR` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Explicit setting, ignoring the environment.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== ReaderStyles =====

/// Styles for the parts of the reading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStyles {
    /// Book title in the header.
    pub book: Style,
    /// Chapter title in the header.
    pub chapter: Style,
    /// Page counter and hints.
    pub footer: Style,
    /// Notification line.
    pub notice: Style,
}

impl ReaderStyles {
    /// Styles for the given color configuration.
    ///
    /// Without colors, emphasis is kept through modifiers only.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        if config.colors_enabled() {
            Self {
                book: bold.fg(Color::Cyan),
                chapter: Style::default().fg(Color::Yellow),
                footer: Style::default().fg(Color::DarkGray),
                notice: bold.fg(Color::Red),
            }
        } else {
            Self {
                book: bold,
                chapter: Style::default(),
                footer: Style::default(),
                notice: Style::default().add_modifier(Modifier::REVERSED),
            }
        }
    }
}

impl Default for ReaderStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}
