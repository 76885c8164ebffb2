//! Event handlers for the TUI: keyboard and mouse.

mod chat_spawn;
mod input;
mod model_selector;
mod shortcuts;

use crossterm::event::{KeyEventKind, MouseEventKind};
use std::sync::Arc;
use std::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tokio::runtime::Runtime;

use crate::core::assistant::{Assistant, TurnOutcome};

use super::app::App;
use super::constants;
use super::shortcuts::Shortcut;

use self::shortcuts::{ShortcutContext, handle_shortcut};

/// Holds receivers for a chat turn in progress (streamed content, final outcome).
pub struct PendingChat {
    pub stream_rx: mpsc::Receiver<String>,
    pub result_rx: mpsc::Receiver<TurnOutcome>,
    /// Token to cancel the in-flight request.
    pub cancel_token: CancellationToken,
}

/// Result of handling an event: continue the loop or exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Break,
}

/// True when Esc would start Option+key (escape_pending) rather than cancel or close a popup.
pub(crate) fn would_esc_start_meta_sequence(
    key: &crossterm::event::KeyEvent,
    app: &App,
    pending_chat: &Option<PendingChat>,
) -> bool {
    Shortcut::is_escape(key) && app.model_selector.is_none() && pending_chat.is_none()
}

/// Handle a mouse event (wheel scrolls the history).
pub fn handle_mouse(mouse: crossterm::event::MouseEvent, app: &mut App) -> HandleResult {
    if app.model_selector.is_none() {
        match mouse.kind {
            MouseEventKind::ScrollUp => app.scroll_up(constants::SCROLL_LINES_SMALL),
            MouseEventKind::ScrollDown => app.scroll_down(constants::SCROLL_LINES_SMALL),
            _ => {}
        }
    }
    HandleResult::Continue
}

/// Context for key event handling. Bundles mutable state to reduce parameter count.
pub struct HandleKeyContext<'a> {
    pub app: &'a mut App,
    pub assistant: &'a Arc<Assistant>,
    pub pending_chat: &'a mut Option<PendingChat>,
    pub pending_probe: &'a mut Option<mpsc::Receiver<(String, bool)>>,
    pub rt: &'a Arc<Runtime>,
}

/// Handle a key event. Returns HandleResult::Break to exit the main loop.
pub fn handle_key(key: crossterm::event::KeyEvent, ctx: HandleKeyContext<'_>) -> HandleResult {
    let HandleKeyContext {
        app,
        assistant,
        pending_chat,
        pending_probe,
        rt,
    } = ctx;

    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    // Esc+key sequence (Option as Meta on Mac terminals)
    if app.escape_pending {
        app.escape_pending = false;
        if let Some(shortcut) = Shortcut::match_key(&key, true) {
            return handle_shortcut(
                shortcut,
                ShortcutContext {
                    app,
                    assistant,
                    pending_chat,
                },
            );
        }
    }

    if let Some(shortcut) = Shortcut::match_key(&key, false) {
        return handle_shortcut(
            shortcut,
            ShortcutContext {
                app,
                assistant,
                pending_chat,
            },
        );
    }

    // Model selector popup
    if app.model_selector.is_some() {
        return model_selector::handle_model_selector(
            key.code,
            key.modifiers,
            app,
            assistant,
            pending_probe,
            rt,
        );
    }

    // Esc: cancel in-flight turn, else start Option+key sequence.
    if Shortcut::is_escape(&key) {
        if let Some(pc) = pending_chat.as_ref() {
            pc.cancel_token.cancel();
        } else {
            app.escape_pending = true;
        }
        return HandleResult::Continue;
    }

    input::handle_main_input(key.code, key.modifiers, app, assistant, pending_chat, rt)
}
