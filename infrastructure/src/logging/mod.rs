//! Conversation transcript logging.
//!
//! Provides [`JsonlConversationLogger`], which implements the
//! [`ConversationLogger`](datachat_application::ConversationLogger) port by
//! appending one JSON object per event to a transcript file.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
