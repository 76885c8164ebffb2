//! Centralized keyboard shortcuts.
//!
//! Complete reference:
//!
//! | Action         | Keys                                     |
//! |----------------|------------------------------------------|
//! | Send           | Enter                                    |
//! | Newline        | Shift+Enter, Alt+Enter                   |
//! | Scroll         | ↑ ↓ PageUp PageDown                      |
//! | Cancel         | Esc (while a reply is in flight)         |
//! | New conv       | Ctrl+N                                   |
//! | Model selector | Alt+M, Esc+m, µ (Option+M Mac)           |
//! | Copy reply     | Alt+C, Esc+c                             |
//! | Quit           | Ctrl+C                                   |
//!
//! On macOS, Option+key can send:
//! - Esc+key if terminal has "Use option as meta key" enabled
//! - A special character (µ, ç) if Option is in normal mode

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Detected shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// New conversation (Ctrl+N)
    NewConversation,
    /// Model selector (Alt+M, Esc+m)
    ModelSelector,
    /// Copy the last reply to the clipboard (Alt+C, Esc+c)
    CopyLastReply,
    /// Quit (Ctrl+C)
    Quit,
}

const MAC_OPTION_M: char = '\u{00B5}'; // µ
const MAC_OPTION_C: char = '\u{00E7}'; // ç

impl Shortcut {
    /// Returns the shortcut if the key matches. Handles Esc+key sequence when terminal
    /// sends Option as Meta (e.g. macOS "Use option as meta key").
    pub fn match_key(key: &KeyEvent, escape_pending: bool) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if escape_pending {
            return match key.code {
                KeyCode::Char('m') => Some(Shortcut::ModelSelector),
                KeyCode::Char('c') => Some(Shortcut::CopyLastReply),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Shortcut::Quit)
            }
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Shortcut::NewConversation)
            }
            KeyCode::Char('m') if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Shortcut::ModelSelector)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Shortcut::CopyLastReply)
            }
            KeyCode::Char(MAC_OPTION_M) => Some(Shortcut::ModelSelector),
            KeyCode::Char(MAC_OPTION_C) => Some(Shortcut::CopyLastReply),
            _ => None,
        }
    }

    /// True if key is Escape (start of Option+key sequence on some terminals).
    pub fn is_escape(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press && key.code == KeyCode::Esc
    }
}

#[cfg(test)]
mod tests {
    use super::Shortcut;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn is_escape() {
        assert!(Shortcut::is_escape(&key(KeyCode::Esc, KeyModifiers::empty())));
        assert!(!Shortcut::is_escape(&key(KeyCode::Char('c'), KeyModifiers::empty())));
    }

    #[test]
    fn match_quit_ctrl_c() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), false),
            Some(Shortcut::Quit)
        );
    }

    #[test]
    fn match_model_selector() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('m'), KeyModifiers::ALT), false),
            Some(Shortcut::ModelSelector)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('µ'), KeyModifiers::empty()), false),
            Some(Shortcut::ModelSelector)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('m'), KeyModifiers::empty()), true),
            Some(Shortcut::ModelSelector)
        );
    }

    #[test]
    fn match_copy_reply() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('c'), KeyModifiers::ALT), false),
            Some(Shortcut::CopyLastReply)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('c'), KeyModifiers::empty()), true),
            Some(Shortcut::CopyLastReply)
        );
    }

    #[test]
    fn match_new_conversation_ctrl_n() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('n'), KeyModifiers::CONTROL), false),
            Some(Shortcut::NewConversation)
        );
    }

    #[test]
    fn match_no_shortcut() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('x'), KeyModifiers::empty()), false),
            None
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('x'), KeyModifiers::empty()), true),
            None
        );
    }

    #[test]
    fn match_key_release_ignored() {
        let key_release = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Release,
            state: KeyEventState::empty(),
        };
        assert_eq!(Shortcut::match_key(&key_release, false), None);
    }
}

/// Labels for the bottom bar.
pub mod labels {
    use ratatui::style::Color;
    use ratatui::text::{Line, Span, Text};

    const DIM: Color = Color::DarkGray;

    pub fn bottom_bar(is_busy: bool) -> Text<'static> {
        if is_busy {
            Text::from(Line::from(vec![
                Span::styled("Esc ", Color::Yellow),
                Span::raw("cancel"),
                Span::styled("  ↑↓ ", DIM),
                Span::raw("scroll"),
                Span::styled("  Ctrl+C ", DIM),
                Span::raw("quit"),
            ]))
        } else {
            Text::from(Line::from(vec![
                Span::styled("Enter ", DIM),
                Span::raw("send"),
                Span::styled("  Shift+Enter ", DIM),
                Span::raw("newline"),
                Span::styled("  Alt+M ", DIM),
                Span::raw("model"),
                Span::styled("  Alt+C ", DIM),
                Span::raw("copy"),
                Span::styled("  Ctrl+N ", DIM),
                Span::raw("new"),
                Span::styled("  Ctrl+C ", DIM),
                Span::raw("quit"),
            ]))
        }
    }
}
