//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod agent;
pub mod conversation_logger;
pub mod datasource_tool;
pub mod reply_observer;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted_agent;
