//! Domain layer for datachat
//!
//! This crate contains the conversation entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Message / ChatHistory**: the ordered dialogue between the user and
//!   the agent, owned by a single chat session
//! - **Snapshot**: one "latest state" emission of a streamed agent turn,
//!   carrying the full message list known so far
//! - **UserInput**: classification of a raw input line (utterance, empty,
//!   termination keyword)

pub mod core;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::input::UserInput;
pub use prompt::{AgentPromptTemplate, DATASOURCE_TOOL_NAME};
pub use session::{
    entities::{ChatHistory, Message, Role},
    stream::Snapshot,
};
