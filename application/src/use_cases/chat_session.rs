//! Chat session use case.
//!
//! Drives one multi-turn dialogue against an [`Agent`]. The session owns the
//! [`ChatHistory`]: a user message is appended before the agent is invoked,
//! the agent message is appended once the stream completes with a non-empty
//! reply, and a failed turn is rolled back so the next attempt starts from
//! a consistent history.

use crate::ports::agent::{Agent, AgentError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::reply_observer::ReplyObserver;
use crate::use_cases::reply::drain_reply;
use datachat_domain::util::preview;
use datachat_domain::{ChatHistory, Message, UserInput};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by a chat turn
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Agent invocation failed: {0}")]
    AgentInvocation(#[from] AgentError),

    #[error("message cannot be empty")]
    EmptyInput,
}

/// Result of handling one raw input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The line was empty; nothing happened
    Ignored,
    /// A termination keyword; the caller should leave its loop
    Quit,
    /// A completed turn with the agent's reply
    Replied(String),
}

/// A conversational session over a shared agent.
pub struct ChatSession {
    agent: Arc<dyn Agent>,
    history: ChatHistory,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatSession {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            history: ChatHistory::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Forget the whole dialogue.
    pub fn clear(&mut self) {
        debug!("Clearing {} messages of chat history", self.history.len());
        self.history.clear();
    }

    /// Classify a raw input line and run a turn if it is an utterance.
    ///
    /// Termination keywords and empty lines never touch the history.
    pub async fn handle(
        &mut self,
        line: &str,
        observer: &dyn ReplyObserver,
    ) -> Result<TurnOutcome, ChatError> {
        match UserInput::parse(line) {
            UserInput::Quit => Ok(TurnOutcome::Quit),
            UserInput::Empty => Ok(TurnOutcome::Ignored),
            UserInput::Utterance(text) => match self.submit(&text, observer).await? {
                Some(reply) => Ok(TurnOutcome::Replied(reply)),
                None => Ok(TurnOutcome::Ignored),
            },
        }
    }

    /// Run one turn for `utterance`.
    ///
    /// Returns `Ok(None)` without invoking the agent when the utterance is
    /// empty or whitespace-only. On failure the user message is removed
    /// again and the error is returned; the session stays usable.
    pub async fn submit(
        &mut self,
        utterance: &str,
        observer: &dyn ReplyObserver,
    ) -> Result<Option<String>, ChatError> {
        let text = utterance.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let checkpoint = self.history.checkpoint();
        self.history.push(Message::user(text));
        info!(
            "Turn {}: {}",
            self.history.turn_count() + 1,
            preview(text, 100)
        );

        observer.on_turn_start();
        let result = self.run_turn(observer).await;
        observer.on_turn_end();

        match result {
            Ok(reply) => {
                self.history.push(Message::agent(reply.clone()));
                debug!("Turn completed, history has {} messages", self.history.len());

                self.conversation_logger.log(ConversationEvent::new(
                    "turn_completed",
                    serde_json::json!({
                        "turn": self.history.turn_count(),
                        "user": text,
                        "agent": reply,
                    }),
                ));
                Ok(Some(reply))
            }
            Err(e) => {
                self.history.rollback_to(checkpoint);
                warn!("Turn failed, history rolled back: {}", e);

                self.conversation_logger.log(ConversationEvent::new(
                    "turn_failed",
                    serde_json::json!({
                        "user": text,
                        "error": e.to_string(),
                    }),
                ));
                Err(ChatError::AgentInvocation(e))
            }
        }
    }

    async fn run_turn(&self, observer: &dyn ReplyObserver) -> Result<String, AgentError> {
        let stream = self.agent.stream(self.history.messages()).await?;
        let reply = drain_reply(stream, observer).await?;
        if reply.trim().is_empty() {
            return Err(AgentError::EmptyResponse);
        }
        Ok(reply)
    }
}
