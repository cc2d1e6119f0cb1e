//! Agent port
//!
//! Defines the interface to the opaque component that answers a
//! conversation. The agent decides on its own whether to call auxiliary
//! tools; callers only see a stream of [`Snapshot`]s.

use async_trait::async_trait;
use datachat_domain::{Message, Snapshot};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while invoking an agent
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Agent produced no response")]
    EmptyResponse,

    #[error("Agent exceeded {0} reasoning steps")]
    TooManySteps(usize),

    #[error("{0}")]
    Other(String),
}

/// Handle for receiving the snapshots of one streamed agent turn.
///
/// Wraps an `mpsc::Receiver`. The stream ends when the sender side is
/// dropped; an `Err` item ends the turn with a failure.
pub struct SnapshotStream {
    receiver: mpsc::Receiver<Result<Snapshot, AgentError>>,
}

impl SnapshotStream {
    pub fn new(receiver: mpsc::Receiver<Result<Snapshot, AgentError>>) -> Self {
        Self { receiver }
    }

    /// Create a bounded channel and the stream reading from it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Result<Snapshot, AgentError>>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }

    /// Build an already-complete stream from a fixed list of items.
    pub fn from_items(items: Vec<Result<Snapshot, AgentError>>) -> Self {
        let (tx, stream) = Self::channel(items.len());
        for item in items {
            // Capacity equals the item count, so this never fails
            let _ = tx.try_send(item);
        }
        stream
    }

    /// Receive the next snapshot, or `None` once the turn is over.
    pub async fn next(&mut self) -> Option<Result<Snapshot, AgentError>> {
        self.receiver.recv().await
    }
}

/// A conversational agent producing a lazy sequence of snapshots.
///
/// Implementations live in the infrastructure layer. One instance may be
/// shared by concurrent callers; each call receives its own message list.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Start a turn over `messages` (oldest first) and return its snapshots.
    async fn stream(&self, messages: &[Message]) -> Result<SnapshotStream, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_items_yields_items_then_ends() {
        let mut stream = SnapshotStream::from_items(vec![
            Ok(Snapshot::new(vec![Message::agent("a")])),
            Err(AgentError::Stream("boom".to_string())),
        ]);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.latest_agent_text(), Some("a"));
        assert!(matches!(stream.next().await, Some(Err(AgentError::Stream(_)))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_stream_ends_immediately() {
        let mut stream = SnapshotStream::from_items(Vec::new());
        assert!(stream.next().await.is_none());
    }
}
