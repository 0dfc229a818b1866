//! Keyboard bindings configuration.

use crate::model::ReaderAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to reader actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, ReaderAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only the code and modifiers take part in the lookup; release and
    /// repeat events resolve like presses.
    pub fn get(&self, key: KeyEvent) -> Option<ReaderAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Bind `key` (code + modifiers) to `action`, replacing any prior binding.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: ReaderAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }

    /// Whether `key` is a press that should be handled.
    pub fn is_press(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        // Page turns
        for code in [KeyCode::Right, KeyCode::PageDown, KeyCode::Char(' '), KeyCode::Char('l')] {
            bindings.bind(code, KeyModifiers::NONE, ReaderAction::PageDown);
        }
        for code in [KeyCode::Left, KeyCode::PageUp, KeyCode::Char('h')] {
            bindings.bind(code, KeyModifiers::NONE, ReaderAction::PageUp);
        }

        // Chapter jumps
        bindings.bind(KeyCode::Char(']'), KeyModifiers::NONE, ReaderAction::NextChapter);
        bindings.bind(KeyCode::Char('['), KeyModifiers::NONE, ReaderAction::PrevChapter);

        // Go to chapter by number
        for digit in 0..=9u8 {
            let code = KeyCode::Char(char::from(b'0' + digit));
            bindings.bind(code, KeyModifiers::NONE, ReaderAction::ChapterDigit(digit));
        }
        bindings.bind(KeyCode::Backspace, KeyModifiers::NONE, ReaderAction::EraseDigit);
        bindings.bind(KeyCode::Enter, KeyModifiers::NONE, ReaderAction::Confirm);

        // Quit
        bindings.bind(KeyCode::Char('q'), KeyModifiers::NONE, ReaderAction::Quit);
        bindings.bind(KeyCode::Esc, KeyModifiers::NONE, ReaderAction::Quit);
        bindings.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, ReaderAction::Quit);

        bindings
    }
}
