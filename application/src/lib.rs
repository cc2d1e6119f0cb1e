//! Application layer for datachat
//!
//! This crate contains the chat session use cases and the port definitions
//! they depend on. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    agent::{Agent, AgentError, SnapshotStream},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    datasource_tool::{DatasourceTool, ToolError},
    reply_observer::{NoReplyObserver, ReplyObserver},
};
#[cfg(any(test, feature = "test-util"))]
pub use ports::scripted_agent::ScriptedAgent;
pub use use_cases::ask_once::AskOnceUseCase;
pub use use_cases::chat_session::{ChatError, ChatSession, TurnOutcome};
