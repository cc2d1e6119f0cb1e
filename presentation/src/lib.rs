//! Presentation layer for datachat
//!
//! This crate contains the CLI definitions, the interactive chat REPL,
//! console rendering of streamed replies, and the web front end.

pub mod chat;
pub mod cli;
pub mod output;
pub mod web;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, Command};
pub use output::ConsoleReplyPrinter;
pub use web::{AppState, serve};
