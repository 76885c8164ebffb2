//! Chat turns and the in-memory transcript.

use serde::{Deserialize, Serialize};

/// Assistant greeting shown above every conversation (not part of the transcript).
pub const WELCOME_MESSAGE: &str = "Hello! How can I assist you right now?";

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single chat turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// The greeting group displayed before the transcript.
pub fn welcome_group() -> Vec<ChatTurn> {
    vec![ChatTurn::assistant(WELCOME_MESSAGE)]
}

/// Ordered list of turns for one conversation.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Concatenate `chunk` onto the last turn's content. No-op on an empty transcript.
    pub fn append_to_last(&mut self, chunk: &str) {
        if let Some(last) = self.turns.last_mut() {
            last.content.push_str(chunk);
        }
    }

    /// Drop the last turn if it is an assistant turn with no content.
    pub fn pop_empty_assistant(&mut self) -> bool {
        if self
            .turns
            .last()
            .is_some_and(|t| t.role == Role::Assistant && t.content.is_empty())
        {
            self.turns.pop();
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Split turns into display groups: every user turn opens a new group.
    /// Turns before the first user turn form a leading group.
    pub fn groups(&self) -> Vec<&[ChatTurn]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for (i, turn) in self.turns.iter().enumerate() {
            if turn.role == Role::User && i > start {
                groups.push(&self.turns[start..i]);
                start = i;
            }
        }
        if start < self.turns.len() {
            groups.push(&self.turns[start..]);
        }
        groups
    }
}
