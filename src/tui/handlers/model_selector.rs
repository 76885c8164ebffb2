//! Handler for model selector popup.

use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;
use std::sync::mpsc;

use tokio::runtime::Runtime;

use crate::core::assistant::Assistant;

use super::super::app::{App, ModelSelectorState};
use super::HandleResult;
use super::chat_spawn;

/// Action to apply after handling a model selector key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ModelSelectorAction {
    Close,
    Select(String),
    /// Probe the highlighted model.
    Probe(String),
    /// No action; keep the selector open.
    Keep,
}

/// Handle key when model selector is open. Returns action to apply; caller applies to app.
pub(crate) fn handle_model_selector_key(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    selector: &mut ModelSelectorState,
) -> ModelSelectorAction {
    match key_code {
        KeyCode::Esc => return ModelSelectorAction::Close,
        KeyCode::Char('t') if key_modifiers.contains(KeyModifiers::CONTROL) => {
            return match selector.selected() {
                Some(m) if selector.probing.is_none() => ModelSelectorAction::Probe(m.id.clone()),
                _ => ModelSelectorAction::Keep,
            };
        }
        KeyCode::Backspace => {
            selector.filter.pop();
        }
        KeyCode::Char(c) if !key_modifiers.contains(KeyModifiers::CONTROL) => {
            selector.filter.push(c);
        }
        _ => {}
    }

    let visible_len = selector.visible().len();
    match key_code {
        KeyCode::Up => {
            selector.selected_index = selector.selected_index.saturating_sub(1);
            ModelSelectorAction::Keep
        }
        KeyCode::Down => {
            if visible_len > 0 {
                selector.selected_index = (selector.selected_index + 1).min(visible_len - 1);
            }
            ModelSelectorAction::Keep
        }
        KeyCode::Enter => match selector.selected() {
            Some(m) => ModelSelectorAction::Select(m.id.clone()),
            None => ModelSelectorAction::Keep,
        },
        KeyCode::Backspace | KeyCode::Char(_) => {
            selector.selected_index = selector.selected_index.min(visible_len.saturating_sub(1));
            ModelSelectorAction::Keep
        }
        _ => ModelSelectorAction::Keep,
    }
}

/// Switch the assistant to `model` and note the change in the transcript.
pub(crate) fn apply_model_change(app: &mut App, assistant: &Assistant, model: &str) {
    app.model_selector = None;
    assistant.set_model(model);
    app.model_id = model.to_string();
    app.push_system(format!("Model changed to {}", model));
}

/// Handle a key while the selector is open.
pub(crate) fn handle_model_selector(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
    assistant: &Arc<Assistant>,
    pending_probe: &mut Option<mpsc::Receiver<(String, bool)>>,
    rt: &Arc<Runtime>,
) -> HandleResult {
    let Some(selector) = app.model_selector.as_mut() else {
        return HandleResult::Continue;
    };
    match handle_model_selector_key(key_code, key_modifiers, selector) {
        ModelSelectorAction::Close => app.model_selector = None,
        ModelSelectorAction::Select(id) => apply_model_change(app, assistant, &id),
        ModelSelectorAction::Probe(id) => {
            selector.probing = Some(id.clone());
            *pending_probe = Some(chat_spawn::spawn_probe(rt, Arc::clone(assistant), id));
        }
        ModelSelectorAction::Keep => {}
    }
    HandleResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assistant::RelayClient;
    use crate::core::models::ModelInfo;
    use reqwest::Url;

    fn selector() -> ModelSelectorState {
        ModelSelectorState::new(
            vec![
                ModelInfo::new("a4", "Meee API"),
                ModelInfo::new("a5", "Meee API"),
                ModelInfo::new("x1", "Acme"),
            ],
            "a4",
        )
    }

    fn press(s: &mut ModelSelectorState, code: KeyCode) -> ModelSelectorAction {
        handle_model_selector_key(code, KeyModifiers::empty(), s)
    }

    #[test]
    fn navigate_and_select() {
        let mut s = selector();
        assert_eq!(press(&mut s, KeyCode::Down), ModelSelectorAction::Keep);
        assert_eq!(press(&mut s, KeyCode::Down), ModelSelectorAction::Keep);
        assert_eq!(press(&mut s, KeyCode::Down), ModelSelectorAction::Keep);
        assert_eq!(s.selected_index, 2);
        assert_eq!(
            press(&mut s, KeyCode::Enter),
            ModelSelectorAction::Select("x1".into())
        );
    }

    #[test]
    fn typing_filters_and_clamps() {
        let mut s = selector();
        s.selected_index = 2;
        for c in "a5".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        assert_eq!(s.selected_index, 0);
        assert_eq!(
            press(&mut s, KeyCode::Enter),
            ModelSelectorAction::Select("a5".into())
        );
        for c in "zzz".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        assert_eq!(press(&mut s, KeyCode::Enter), ModelSelectorAction::Keep);
        assert_eq!(press(&mut s, KeyCode::Esc), ModelSelectorAction::Close);
    }

    #[test]
    fn ctrl_t_probes_once() {
        let mut s = selector();
        assert_eq!(
            handle_model_selector_key(KeyCode::Char('t'), KeyModifiers::CONTROL, &mut s),
            ModelSelectorAction::Probe("a4".into())
        );
        assert!(s.filter.is_empty());
        s.probing = Some("a4".into());
        assert_eq!(
            handle_model_selector_key(KeyCode::Char('t'), KeyModifiers::CONTROL, &mut s),
            ModelSelectorAction::Keep
        );
    }

    #[test]
    fn model_change_adds_system_turn() {
        let client = RelayClient::new(Url::parse("http://127.0.0.1:1/api/chat").unwrap());
        let assistant = Assistant::with_client(client, vec![], "a4");
        let mut app = App::new("a4".into(), false);
        app.model_selector = Some(selector());

        apply_model_change(&mut app, &assistant, "a5");
        assert!(app.model_selector.is_none());
        assert_eq!(assistant.model(), "a5");
        assert_eq!(app.model_id, "a5");
        assert_eq!(app.transcript.last().unwrap().content, "Model changed to a5");
    }

    #[test]
    fn reselecting_current_model_still_notes_it() {
        let client = RelayClient::new(Url::parse("http://127.0.0.1:1/api/chat").unwrap());
        let assistant = Assistant::with_client(client, vec![], "a4");
        let mut app = App::new("a4".into(), false);
        app.model_selector = Some(selector());

        apply_model_change(&mut app, &assistant, "a4");
        assert!(app.model_selector.is_none());
        assert_eq!(assistant.model(), "a4");
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.last().unwrap().content, "Model changed to a4");
    }
}
