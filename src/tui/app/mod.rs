//! TUI application state: transcript, input, scroll, model selector.

mod messages;

use chrono::{DateTime, Local};
use ratatui::widgets::ListState;
use std::time::Instant;

use crate::core::message::Transcript;
use crate::core::models::{self, ModelInfo};

/// State for the model selector popup.
pub struct ModelSelectorState {
    pub models: Vec<ModelInfo>,
    /// Index into the filtered list.
    pub selected_index: usize,
    pub list_state: ListState,
    /// Filter query (case-insensitive search on model id/provider).
    pub filter: String,
    /// Model currently being probed (Ctrl+T), if any.
    pub probing: Option<String>,
}

impl ModelSelectorState {
    pub fn new(models: Vec<ModelInfo>, current: &str) -> Self {
        let mut state = Self {
            models,
            selected_index: 0,
            list_state: ListState::default(),
            filter: String::new(),
            probing: None,
        };
        state.selected_index = state
            .visible()
            .iter()
            .position(|m| m.id == current)
            .unwrap_or(0);
        state
    }

    /// Models matching the filter, in display order (grouped by provider).
    pub fn visible(&self) -> Vec<&ModelInfo> {
        let filtered = models::filter_models(&self.models, &self.filter);
        models::group_by_provider(&filtered)
            .into_iter()
            .flat_map(|(_, members)| members)
            .collect()
    }

    /// Highlighted model, if the filtered list is not empty.
    pub fn selected(&self) -> Option<&ModelInfo> {
        self.visible().get(self.selected_index).copied()
    }
}

/// Scroll position: either a specific line index, or "at bottom" (follow new content).
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScrollPosition {
    Line(usize),
    Bottom,
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self::Line(0)
    }
}

pub struct App {
    pub(crate) transcript: Transcript,
    /// When each turn was added; parallel to the transcript.
    pub(crate) turn_times: Vec<DateTime<Local>>,
    /// User input in the text field.
    pub(crate) input: String,
    /// Cursor position in the input (byte index; used for Left/Right, insert, Backspace).
    pub(crate) input_cursor: usize,
    pub(crate) scroll: ScrollPosition,
    pub(crate) last_max_scroll: usize,
    /// Current model id shown in the header; empty means none selected.
    pub model_id: String,
    /// When set, show model selector popup (Alt+M).
    pub model_selector: Option<ModelSelectorState>,
    /// Request sent, no chunk received yet.
    pub(crate) is_loading: bool,
    /// Chunks are arriving into the last assistant turn.
    pub(crate) is_streaming: bool,
    /// Esc was pressed; next key = Option+key (Mac terminals with "Use option as meta").
    pub(crate) escape_pending: bool,
    /// Whether to show HH:MM next to message labels (from MEEE_SHOW_TIMESTAMPS).
    pub(crate) show_timestamps: bool,
    /// When set, show "Copied" toast until this instant.
    pub(crate) copy_toast_until: Option<Instant>,
}

impl App {
    pub fn new(model_id: String, show_timestamps: bool) -> Self {
        Self {
            transcript: Transcript::new(),
            turn_times: vec![],
            input: String::new(),
            input_cursor: 0,
            scroll: ScrollPosition::default(),
            last_max_scroll: 0,
            model_id,
            model_selector: None,
            is_loading: false,
            is_streaming: false,
            escape_pending: false,
            show_timestamps,
            copy_toast_until: None,
        }
    }

    /// True while a turn is in flight; input and model selection are disabled.
    pub(crate) fn is_busy(&self) -> bool {
        self.is_loading || self.is_streaming
    }

    /// Reset to a new empty conversation.
    pub(crate) fn new_conversation(&mut self) {
        self.transcript.clear();
        self.turn_times.clear();
        self.is_loading = false;
        self.is_streaming = false;
        self.scroll = ScrollPosition::default();
        self.last_max_scroll = 0;
    }

    /// Must be called before scroll_up/scroll_down when at bottom.
    pub(crate) fn materialize_scroll(&mut self) {
        if self.scroll == ScrollPosition::Bottom {
            self.scroll = ScrollPosition::Line(self.last_max_scroll);
        }
    }

    pub(crate) fn scroll_down(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line((pos + n).min(self.last_max_scroll));
        }
    }

    pub(crate) fn scroll_up(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line(pos.saturating_sub(n));
        }
    }

    /// Resolve scroll position to a concrete line index.
    pub(crate) fn scroll_line(&self) -> usize {
        match self.scroll {
            ScrollPosition::Line(n) => n.min(self.last_max_scroll),
            ScrollPosition::Bottom => self.last_max_scroll,
        }
    }
}
