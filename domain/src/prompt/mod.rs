//! Prompt domain
//!
//! System prompt and tool description handed to the agent.

pub mod agent;

pub use agent::{AgentPromptTemplate, DATASOURCE_TOOL_NAME};
