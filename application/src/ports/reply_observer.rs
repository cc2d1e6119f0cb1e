//! Reply observer port
//!
//! Lets a front end display the agent's reply while it is still streaming.

/// Callback for reply updates during one turn
///
/// Each update carries the full reply text as currently known. It replaces
/// the previous update rather than extending it.
pub trait ReplyObserver: Send + Sync {
    /// Called before the agent is invoked
    fn on_turn_start(&self) {}

    /// Called whenever the reply text changes
    fn on_reply_update(&self, text: &str);

    /// Called once the stream is exhausted or has failed
    fn on_turn_end(&self) {}
}

/// No-op observer for callers that only need the final reply
pub struct NoReplyObserver;

impl ReplyObserver for NoReplyObserver {
    fn on_reply_update(&self, _text: &str) {}
}
