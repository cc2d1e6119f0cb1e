//! Use cases (application services)

pub mod ask_once;
pub mod chat_session;
mod reply;
