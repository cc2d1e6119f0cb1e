//! Snapshots of a streamed agent turn.
//!
//! An agent does not stream token deltas to the session. It emits a
//! sequence of [`Snapshot`]s, each holding the full message list as known
//! at that point. Consumers look only at the trailing message and treat
//! every new snapshot as replacing the previous one (last write wins).

use super::entities::Message;
use serde::{Deserialize, Serialize};

/// One "latest state" emission during a streamed agent turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub messages: Vec<Message>,
}

impl Snapshot {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// The trailing message of this snapshot, if any.
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the trailing message, only when the agent authored it.
    pub fn latest_agent_text(&self) -> Option<&str> {
        self.latest_message()
            .filter(|m| m.is_agent())
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_latest_message() {
        let snapshot = Snapshot::default();
        assert!(snapshot.latest_message().is_none());
        assert!(snapshot.latest_agent_text().is_none());
    }

    #[test]
    fn latest_agent_text_reads_trailing_agent_message() {
        let snapshot = Snapshot::new(vec![
            Message::user("Top customers?"),
            Message::agent("According to the data, "),
        ]);
        assert_eq!(snapshot.latest_agent_text(), Some("According to the data, "));
    }

    #[test]
    fn non_agent_trailing_message_is_ignored() {
        let snapshot = Snapshot::new(vec![
            Message::user("Top customers?"),
            Message::agent(""),
            Message::tool("{\"rows\": []}"),
        ]);
        assert_eq!(
            snapshot.latest_message().map(|m| m.content.as_str()),
            Some("{\"rows\": []}")
        );
        assert!(snapshot.latest_agent_text().is_none());

        let user_only = Snapshot::new(vec![Message::user("hello")]);
        assert!(user_only.latest_agent_text().is_none());
    }
}
