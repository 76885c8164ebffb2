//! Shortcut key handling (NewConversation, ModelSelector, CopyLastReply, Quit).

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::assistant::Assistant;
use crate::tui::shortcuts::Shortcut;

use super::super::app::{App, ModelSelectorState};
use super::HandleResult;

/// Context passed to shortcut handlers (reduces parameter count).
pub(super) struct ShortcutContext<'a> {
    pub app: &'a mut App,
    pub assistant: &'a Arc<Assistant>,
    pub pending_chat: &'a mut Option<super::PendingChat>,
}

pub(super) fn handle_shortcut(shortcut: Shortcut, ctx: ShortcutContext<'_>) -> HandleResult {
    match shortcut {
        Shortcut::NewConversation => {
            if let Some(pc) = ctx.pending_chat.as_ref() {
                pc.cancel_token.cancel();
            }
            *ctx.pending_chat = None;
            ctx.app.model_selector = None;
            ctx.app.new_conversation();
        }
        Shortcut::ModelSelector => {
            // Disabled while a turn is in flight.
            if ctx.app.is_busy() {
                return HandleResult::Continue;
            }
            if ctx.app.model_selector.is_some() {
                ctx.app.model_selector = None;
            } else {
                ctx.app.model_selector = Some(ModelSelectorState::new(
                    ctx.assistant.available_models(),
                    &ctx.app.model_id,
                ));
            }
        }
        Shortcut::CopyLastReply => {
            if let Some(content) = ctx.app.last_reply().map(str::to_string)
                && arboard::Clipboard::new()
                    .and_then(|mut c| c.set_text(content))
                    .is_ok()
            {
                ctx.app.copy_toast_until = Some(Instant::now() + Duration::from_secs(2));
            }
        }
        Shortcut::Quit => {
            if let Some(pc) = ctx.pending_chat.as_ref() {
                pc.cancel_token.cancel();
            }
            return HandleResult::Break;
        }
    }
    HandleResult::Continue
}
