//! Scripted [`Agent`] for tests
//!
//! Compiled for this crate's own tests and, through the `test-util`
//! feature, for downstream crates' tests.

use super::agent::{Agent, AgentError, SnapshotStream};
use async_trait::async_trait;
use datachat_domain::{Message, Snapshot};
use std::collections::VecDeque;
use std::sync::Mutex;

enum Script {
    Fail(AgentError),
    Stream(Vec<Result<Snapshot, AgentError>>),
    Reply(Vec<String>),
}

/// Agent that replays pre-recorded turns, one per call.
///
/// Used as a test double for the [`Agent`] port. Records every message
/// list it was invoked with.
#[derive(Default)]
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next call fails before any snapshot is produced.
    pub fn then_fail(self, error: AgentError) -> Self {
        self.push(Script::Fail(error))
    }

    /// Next call yields exactly these stream items.
    pub fn then_stream(self, items: Vec<Result<Snapshot, AgentError>>) -> Self {
        self.push(Script::Stream(items))
    }

    /// Next call yields one snapshot per partial: the caller's messages
    /// followed by an agent message holding that text.
    pub fn then_reply(self, partials: &[&str]) -> Self {
        self.push(Script::Reply(
            partials.iter().map(|s| s.to_string()).collect(),
        ))
    }

    fn push(self, script: Script) -> Self {
        self.script.lock().unwrap().push_back(script);
        self
    }

    /// Message lists received so far, one entry per call.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn stream(&self, messages: &[Message]) -> Result<SnapshotStream, AgentError> {
        self.calls.lock().unwrap().push(messages.to_vec());

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Other("No more scripted turns".to_string()))?;

        match next {
            Script::Fail(error) => Err(error),
            Script::Stream(items) => Ok(SnapshotStream::from_items(items)),
            Script::Reply(partials) => {
                let items = partials
                    .into_iter()
                    .map(|text| {
                        let mut snapshot = messages.to_vec();
                        snapshot.push(Message::agent(text));
                        Ok(Snapshot::new(snapshot))
                    })
                    .collect();
                Ok(SnapshotStream::from_items(items))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_agent_replays_turns_in_order() {
        let agent = ScriptedAgent::new()
            .then_reply(&["Hel", "Hello"])
            .then_fail(AgentError::Request("down".to_string()));

        let history = vec![Message::user("hi")];
        let mut stream = agent.stream(&history).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.latest_agent_text(), Some("Hel"));

        assert!(agent.stream(&history).await.is_err());
        assert!(matches!(
            agent.stream(&history).await,
            Err(AgentError::Other(_))
        ));
        assert_eq!(agent.call_count(), 3);
        assert_eq!(agent.calls()[0], history);
    }
}
