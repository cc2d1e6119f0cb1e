//! OpenAI-compatible model adapter.

mod agent;
pub mod protocol;

pub use agent::OpenAiAgent;
