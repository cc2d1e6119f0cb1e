//! Chat session domain.
//!
//! - [`entities::Message`]: a single message authored by the user, the agent or a tool
//! - [`entities::ChatHistory`]: the ordered history owned by one session
//! - [`stream::Snapshot`]: one state emission of a streamed agent turn

pub mod entities;
pub mod stream;
