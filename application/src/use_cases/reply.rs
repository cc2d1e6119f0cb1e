//! Reduction of a snapshot stream to the final reply text.

use crate::ports::agent::{AgentError, SnapshotStream};
use crate::ports::reply_observer::ReplyObserver;
use tracing::trace;

/// Consume `stream` to exhaustion and return the last agent-authored text.
///
/// Only the trailing message of each snapshot is inspected, and only when
/// the agent wrote it. A newer agent snapshot replaces the current text.
/// The first `Err` item aborts the turn; no partial reply is kept.
pub(crate) async fn drain_reply(
    mut stream: SnapshotStream,
    observer: &dyn ReplyObserver,
) -> Result<String, AgentError> {
    let mut reply = String::new();
    let mut seen = 0usize;

    while let Some(item) = stream.next().await {
        let snapshot = item?;
        seen += 1;

        if let Some(text) = snapshot.latest_agent_text()
            && text != reply
        {
            reply.clear();
            reply.push_str(text);
            observer.on_reply_update(&reply);
        }
    }

    trace!("Stream finished after {} snapshots", seen);
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datachat_domain::{Message, Snapshot};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        updates: Mutex<Vec<String>>,
    }

    impl ReplyObserver for RecordingObserver {
        fn on_reply_update(&self, text: &str) {
            self.updates.lock().unwrap().push(text.to_string());
        }
    }

    fn snapshot(messages: Vec<Message>) -> Result<Snapshot, AgentError> {
        Ok(Snapshot::new(messages))
    }

    #[tokio::test]
    async fn last_agent_snapshot_wins() {
        let stream = SnapshotStream::from_items(vec![
            snapshot(vec![Message::user("q")]),
            snapshot(vec![Message::user("q"), Message::agent("Total")]),
            snapshot(vec![Message::user("q"), Message::agent("Total sales: $100")]),
        ]);
        let observer = RecordingObserver::default();

        let reply = drain_reply(stream, &observer).await.unwrap();

        assert_eq!(reply, "Total sales: $100");
        assert_eq!(
            *observer.updates.lock().unwrap(),
            vec!["Total".to_string(), "Total sales: $100".to_string()]
        );
    }

    #[tokio::test]
    async fn tool_snapshot_keeps_previous_reply() {
        let stream = SnapshotStream::from_items(vec![
            snapshot(vec![Message::user("q"), Message::agent("Let me check.")]),
            snapshot(vec![
                Message::user("q"),
                Message::agent("Let me check."),
                Message::tool("rows: 3"),
            ]),
        ]);

        let reply = drain_reply(stream, &RecordingObserver::default())
            .await
            .unwrap();
        assert_eq!(reply, "Let me check.");
    }

    #[tokio::test]
    async fn replacement_is_not_appended() {
        let stream = SnapshotStream::from_items(vec![
            snapshot(vec![Message::agent("draft answer")]),
            snapshot(vec![Message::agent("final")]),
        ]);

        let reply = drain_reply(stream, &RecordingObserver::default())
            .await
            .unwrap();
        assert_eq!(reply, "final");
    }

    #[tokio::test]
    async fn error_item_aborts() {
        let stream = SnapshotStream::from_items(vec![
            snapshot(vec![Message::agent("partial")]),
            Err(AgentError::Stream("connection reset".to_string())),
        ]);

        let err = drain_reply(stream, &RecordingObserver::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
