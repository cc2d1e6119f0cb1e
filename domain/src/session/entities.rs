//! Session domain entities

use serde::{Deserialize, Serialize};

/// Author of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
    /// Output of an auxiliary tool run by the agent. Only seen inside
    /// snapshots, never kept in a session's chat history.
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }

    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }
}

/// Ordered chat history of one session (Entity)
///
/// Append-only. The single exception is [`rollback_to`](Self::rollback_to),
/// which a session uses to discard the user message of a failed turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

/// Position in a [`ChatHistory`] that can be rolled back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Mark the current end of the history
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.messages.len())
    }

    /// Drop every message appended after `checkpoint`
    pub fn rollback_to(&mut self, checkpoint: Checkpoint) {
        self.messages.truncate(checkpoint.0);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of completed (user, agent) exchanges
    pub fn turn_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_agent()).count()
    }
}
