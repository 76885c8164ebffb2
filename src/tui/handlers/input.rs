//! Handler for main input (chat input, cursor editing, scroll).

use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::core::assistant::Assistant;

use super::super::app::App;
use super::super::constants;
use super::PendingChat;
use super::chat_spawn;
use super::HandleResult;

fn prev_char_boundary(s: &str, idx: usize) -> usize {
    s[..idx].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(s: &str, idx: usize) -> usize {
    s[idx..]
        .chars()
        .next()
        .map(|c| idx + c.len_utf8())
        .unwrap_or(idx)
}

fn insert_at_cursor(app: &mut App, c: char) {
    app.input.insert(app.input_cursor, c);
    app.input_cursor += c.len_utf8();
}

/// Take the trimmed input for sending. None if blank.
fn take_input(app: &mut App) -> Option<String> {
    let text = app.input.trim().to_string();
    if text.is_empty() {
        return None;
    }
    app.input.clear();
    app.input_cursor = 0;
    Some(text)
}

/// Handle main input keys (when no popup is open).
pub(crate) fn handle_main_input(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
    assistant: &Arc<Assistant>,
    pending_chat: &mut Option<PendingChat>,
    rt: &Arc<Runtime>,
) -> HandleResult {
    // Scrolling stays available while a reply is in flight.
    match key_code {
        KeyCode::Up => {
            app.scroll_up(constants::SCROLL_LINES_SMALL);
            return HandleResult::Continue;
        }
        KeyCode::Down => {
            app.scroll_down(constants::SCROLL_LINES_SMALL);
            return HandleResult::Continue;
        }
        KeyCode::PageUp => {
            app.scroll_up(constants::SCROLL_LINES_PAGE);
            return HandleResult::Continue;
        }
        KeyCode::PageDown => {
            app.scroll_down(constants::SCROLL_LINES_PAGE);
            return HandleResult::Continue;
        }
        _ => {}
    }

    if app.is_busy() || pending_chat.is_some() {
        return HandleResult::Continue;
    }

    match (key_code, key_modifiers) {
        (KeyCode::Enter, mods)
            if mods.contains(KeyModifiers::SHIFT) || mods.contains(KeyModifiers::ALT) =>
        {
            insert_at_cursor(app, '\n');
        }
        (KeyCode::Enter, _) => {
            if let Some(prompt) = take_input(app) {
                app.begin_turn(&prompt);
                *pending_chat = Some(chat_spawn::spawn_chat(rt, Arc::clone(assistant), prompt));
            }
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            app.input.clear();
            app.input_cursor = 0;
        }
        (KeyCode::Backspace, _) => {
            if app.input_cursor > 0 {
                let start = prev_char_boundary(&app.input, app.input_cursor);
                app.input.replace_range(start..app.input_cursor, "");
                app.input_cursor = start;
            }
        }
        (KeyCode::Delete, _) => {
            if app.input_cursor < app.input.len() {
                let end = next_char_boundary(&app.input, app.input_cursor);
                app.input.replace_range(app.input_cursor..end, "");
            }
        }
        (KeyCode::Left, _) => {
            app.input_cursor = prev_char_boundary(&app.input, app.input_cursor);
        }
        (KeyCode::Right, _) => {
            app.input_cursor = next_char_boundary(&app.input, app.input_cursor);
        }
        (KeyCode::Home, _) => app.input_cursor = 0,
        (KeyCode::End, _) => app.input_cursor = app.input.len(),
        (KeyCode::Char(c), mods) => {
            // Ignore Alt/Ctrl+key: user likely intended a shortcut (e.g. Alt+M)
            if mods.contains(KeyModifiers::ALT) || mods.contains(KeyModifiers::CONTROL) {
                return HandleResult::Continue;
            }
            insert_at_cursor(app, c);
        }
        _ => {}
    }
    HandleResult::Continue
}
