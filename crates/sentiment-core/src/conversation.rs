//! Conversation state for the chat panel
//!
//! A [`Conversation`] is an append-only log of user/assistant turns keyed by
//! an identifier generated once when the conversation is created. The chat
//! backend uses that identifier to thread follow-up questions.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Opaque conversation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Ordered, append-only exchange of turns
///
/// Turns are expected to alternate user/assistant, but this is not enforced:
/// a user turn whose reply failed stays in the log unanswered.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    turns: Vec<ConversationTurn>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Start a new conversation with a generated identifier
    pub fn new() -> Self {
        Self {
            id: ConversationId::generate(),
            turns: Vec::new(),
        }
    }

    /// Identifier, stable for the lifetime of the conversation
    pub fn id(&self) -> ConversationId {
        self.id
    }

    /// Append a turn at the end of the log
    pub fn append(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        let index = self.turns.len();
        self.turns.push(turn);
        &self.turns[index]
    }

    /// All turns in submission order
    pub fn all_turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Whether the last turn is a user message still waiting for a reply
    pub fn awaiting_reply(&self) -> bool {
        self.last_turn().is_some_and(|t| t.role == TurnRole::User)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
