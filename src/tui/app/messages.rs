//! Transcript updates driven by the chat lifecycle.

use chrono::Local;

use crate::core::message::{ChatTurn, Role};

use super::{App, ScrollPosition};

/// System turn appended when a turn fails outright.
pub(crate) const FAILURE_NOTICE: &str = "Sorry, I couldn't process your request. Please try again!";

const CANCELLED_NOTICE: &str = "*[Request cancelled]*";

impl App {
    fn push_turn(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
        self.turn_times.push(Local::now());
        self.scroll = ScrollPosition::Bottom;
    }

    pub(crate) fn push_user(&mut self, text: &str) {
        self.push_turn(ChatTurn::user(text));
    }

    pub(crate) fn push_system(&mut self, text: impl Into<String>) {
        self.push_turn(ChatTurn::system(text));
    }

    fn pop_empty_assistant(&mut self) {
        if self.transcript.pop_empty_assistant() {
            self.turn_times.pop();
        }
    }

    /// User turn sent: show the loading indicator until the first chunk.
    pub(crate) fn begin_turn(&mut self, prompt: &str) {
        self.push_user(prompt);
        self.is_loading = true;
        self.is_streaming = false;
    }

    /// Append a streamed chunk. The first chunk opens the assistant turn and ends loading.
    pub(crate) fn append_assistant_chunk(&mut self, chunk: &str) {
        if !self.is_streaming {
            self.push_turn(ChatTurn::assistant(String::new()));
            self.is_loading = false;
            self.is_streaming = true;
        }
        self.transcript.append_to_last(chunk);
    }

    /// Turn completed (reply or fallback already streamed in).
    pub(crate) fn finish_turn(&mut self) {
        self.is_loading = false;
        self.is_streaming = false;
        self.pop_empty_assistant();
    }

    /// The background task died without an outcome.
    pub(crate) fn fail_turn(&mut self) {
        self.finish_turn();
        self.push_system(FAILURE_NOTICE);
    }

    /// Append "[cancelled]" to the last assistant turn (or create one).
    /// Keeps whatever partial content was already streamed.
    pub(crate) fn append_cancelled_notice(&mut self) {
        self.finish_turn();
        match self.transcript.last() {
            Some(t) if t.role == Role::Assistant => {
                self.transcript
                    .append_to_last(&format!("\n\n{}", CANCELLED_NOTICE));
            }
            _ => self.push_turn(ChatTurn::assistant(CANCELLED_NOTICE)),
        }
    }

    /// Content of the most recent assistant turn (for copy).
    pub(crate) fn last_reply(&self) -> Option<&str> {
        self.transcript
            .turns()
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.content.as_str())
    }
}
