//! Terminal output for streamed replies.

pub mod console;

pub use console::ConsoleReplyPrinter;
