//! Infrastructure layer for datachat
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the OpenAI-compatible streaming agent, the
//! command-backed datasource tool, the JSONL transcript logger, and
//! configuration loading.

pub mod config;
pub mod datasource;
pub mod factory;
pub mod logging;
pub mod openai;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, ConfigLoader, FileConfig};
pub use datasource::CommandDatasourceTool;
pub use factory::build_agent;
pub use logging::JsonlConversationLogger;
pub use openai::OpenAiAgent;
