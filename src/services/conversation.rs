//! Conversation buffer — ordered, append-only turn store.
//!
//! DESIGN
//! ======
//! `append` is the sole mutation point. `user_turns` returns owned clones,
//! so a pipeline run holds a snapshot that later appends cannot touch.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One conversational turn. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Ordered, append-only store of turns. Insertion order is significant:
/// classification reads user turns in the order they were spoken.
#[derive(Debug, Clone, Default)]
pub struct ConversationBuffer {
    turns: Vec<Turn>,
}

impl ConversationBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn. Never fails; the buffer's only mutation point.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The ordered subsequence of user-authored turns, as an owned
    /// snapshot.
    #[must_use]
    pub fn user_turns(&self) -> Vec<Turn> {
        self.turns
            .iter()
            .filter(|t| t.role == Role::User)
            .cloned()
            .collect()
    }

    /// All turns in insertion order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
