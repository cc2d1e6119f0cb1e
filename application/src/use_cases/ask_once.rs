//! Ask-once use case.
//!
//! Answers a single question with no retained history. Each call builds its
//! own one-message conversation, so concurrent callers sharing the same
//! agent never see each other's messages.

use crate::ports::agent::Agent;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::reply_observer::ReplyObserver;
use crate::use_cases::chat_session::ChatError;
use crate::use_cases::reply::drain_reply;
use datachat_domain::Message;
use datachat_domain::util::preview;
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for one stateless question/answer exchange.
#[derive(Clone)]
pub struct AskOnceUseCase {
    agent: Arc<dyn Agent>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl AskOnceUseCase {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run the question through the agent and return the final reply text.
    ///
    /// A blank question is rejected with [`ChatError::EmptyInput`] before
    /// the agent is called. The reply may be empty when the agent never
    /// produced an agent message; that is reported as-is.
    pub async fn execute(
        &self,
        question: &str,
        observer: &dyn ReplyObserver,
    ) -> Result<String, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        info!("Ask: {}", preview(question, 100));

        let messages = [Message::user(question)];
        observer.on_turn_start();
        let result = match self.agent.stream(&messages).await {
            Ok(stream) => drain_reply(stream, observer).await,
            Err(e) => Err(e),
        };
        observer.on_turn_end();

        let reply = result.inspect_err(|e| warn!("Ask failed: {}", e))?;

        self.conversation_logger.log(ConversationEvent::new(
            "ask_completed",
            serde_json::json!({
                "user": question,
                "agent": reply,
            }),
        ));
        Ok(reply)
    }
}
