//! Streaming agent over an OpenAI-compatible chat completions endpoint.
//!
//! One call to [`Agent::stream`] spawns a task that runs the
//! reason → call tool → reason loop and emits a [`Snapshot`] whenever the
//! visible conversation changes:
//!
//! - once with the input messages,
//! - after every content delta (the in-progress agent message is last),
//! - after every tool result (the tool message is last).

use super::protocol::{
    ChatRequest, SseData, SseLineBuffer, StepAccumulator, StreamChunk, WireMessage, WireToolCall,
    datasource_tool_schema,
};
use crate::config::ModelSettings;
use async_trait::async_trait;
use datachat_application::ports::agent::{Agent, AgentError, SnapshotStream};
use datachat_application::ports::datasource_tool::{DatasourceTool, ToolError};
use datachat_domain::util::preview;
use datachat_domain::{AgentPromptTemplate, DATASOURCE_TOOL_NAME, Message, Snapshot};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Snapshots buffered between the agent task and the consumer
const STREAM_BUFFER: usize = 64;

type SnapshotSender = mpsc::Sender<Result<Snapshot, AgentError>>;

/// Agent backed by an OpenAI-compatible model with the datasource tool.
///
/// Cheap to share: every turn gets its own transcript, and the HTTP client
/// is reference counted internally.
pub struct OpenAiAgent {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    settings: ModelSettings,
    tool: Arc<dyn DatasourceTool>,
    system_prompt: String,
}

/// Outcome of reading one model response.
enum Step {
    Finished {
        content: String,
        calls: Vec<WireToolCall>,
    },
    /// The consumer dropped the stream
    Abandoned,
}

impl OpenAiAgent {
    pub fn new(settings: ModelSettings, tool: Arc<dyn DatasourceTool>) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AgentError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                settings,
                tool,
                system_prompt: AgentPromptTemplate::system(),
            }),
        })
    }

    pub fn model(&self) -> &str {
        &self.inner.settings.name
    }
}

#[async_trait]
impl Agent for OpenAiAgent {
    async fn stream(&self, messages: &[Message]) -> Result<SnapshotStream, AgentError> {
        let (tx, stream) = SnapshotStream::channel(STREAM_BUFFER);
        let inner = Arc::clone(&self.inner);
        let messages = messages.to_vec();

        tokio::spawn(async move {
            if let Err(e) = inner.run(messages, &tx).await {
                warn!("Agent turn failed: {}", e);
                let _ = tx.send(Err(e)).await;
            }
        });

        Ok(stream)
    }
}

impl Inner {
    async fn run(&self, messages: Vec<Message>, tx: &SnapshotSender) -> Result<(), AgentError> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage::system(self.system_prompt.clone()));
        wire.extend(messages.iter().filter_map(WireMessage::from_message));

        let mut visible = messages;
        if !emit(tx, visible.clone()).await {
            return Ok(());
        }

        let max_steps = self.settings.max_steps;
        for step in 1..=max_steps {
            debug!("Model step {}/{}", step, max_steps);

            let (content, calls) = match self.model_step(&wire, &visible, tx).await? {
                Step::Finished { content, calls } => (content, calls),
                Step::Abandoned => return Ok(()),
            };

            if calls.is_empty() {
                info!("Agent replied after {} step(s)", step);
                return Ok(());
            }

            if !content.is_empty() {
                visible.push(Message::agent(content.clone()));
            }
            wire.push(WireMessage::assistant_calls(content, calls.clone()));

            for call in &calls {
                let output = self.call_tool(call).await;
                wire.push(WireMessage::tool_result(call.id.clone(), output.clone()));
                visible.push(Message::tool(output));
                if !emit(tx, visible.clone()).await {
                    return Ok(());
                }
            }
        }

        Err(AgentError::TooManySteps(max_steps))
    }

    async fn model_step(
        &self,
        wire: &[WireMessage],
        visible: &[Message],
        tx: &SnapshotSender,
    ) -> Result<Step, AgentError> {
        let request = ChatRequest {
            model: &self.settings.name,
            messages: wire,
            temperature: self.settings.temperature,
            stream: true,
            tools: vec![datasource_tool_schema()],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Request(format!("{}: {}", status, body.trim())));
        }

        let mut acc = StepAccumulator::default();
        let mut lines = SseLineBuffer::default();
        let mut body = response.bytes_stream();

        'read: while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| AgentError::Stream(e.to_string()))?;
            for data in lines.push(&chunk) {
                match data {
                    SseData::Done => break 'read,
                    SseData::Json(json) => {
                        if apply_chunk(&mut acc, &json)? && !emit_partial(tx, visible, &acc).await
                        {
                            return Ok(Step::Abandoned);
                        }
                    }
                }
            }
        }
        if let Some(SseData::Json(json)) = lines.finish()
            && apply_chunk(&mut acc, &json)?
            && !emit_partial(tx, visible, &acc).await
        {
            return Ok(Step::Abandoned);
        }

        let (content, calls) = acc.finish();
        Ok(Step::Finished { content, calls })
    }

    /// Run one requested tool call. Failures are reported back to the model
    /// as the tool result rather than ending the turn.
    async fn call_tool(&self, call: &WireToolCall) -> String {
        if call.function.name != DATASOURCE_TOOL_NAME {
            warn!("Model requested unknown tool '{}'", call.function.name);
            return format!("Error: unknown tool '{}'", call.function.name);
        }

        let question = match call.function.query_argument() {
            Ok(question) => question,
            Err(reason) => return format!("Error: {}", ToolError::InvalidArguments(reason)),
        };

        info!("Tool call {}: {}", call.id, preview(&question, 100));
        match self.tool.query(&question).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Datasource tool failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}

/// Apply one streamed chunk. Returns `true` when visible content changed.
fn apply_chunk(acc: &mut StepAccumulator, json: &str) -> Result<bool, AgentError> {
    let chunk: StreamChunk = serde_json::from_str(json)
        .map_err(|e| AgentError::Stream(format!("invalid chunk: {}", e)))?;

    let mut changed = false;
    for choice in chunk.choices {
        changed |= acc.apply(choice.delta).map_err(AgentError::Stream)?;
    }
    Ok(changed)
}

async fn emit_partial(tx: &SnapshotSender, visible: &[Message], acc: &StepAccumulator) -> bool {
    let mut messages = visible.to_vec();
    messages.push(Message::agent(acc.content()));
    emit(tx, messages).await
}

/// Send a snapshot. Returns `false` once nobody is listening.
async fn emit(tx: &SnapshotSender, messages: Vec<Message>) -> bool {
    tx.send(Ok(Snapshot::new(messages))).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use datachat_domain::Role;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    // ==================== Test Helpers ====================

    #[derive(Default)]
    struct FakeTool {
        questions: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl DatasourceTool for FakeTool {
        async fn query(&self, question: &str) -> Result<String, ToolError> {
            self.questions.lock().unwrap().push(question.to_string());
            if self.fail {
                return Err(ToolError::Failed {
                    status: 1,
                    stderr: "token expired".to_string(),
                });
            }
            Ok("Sean Miller: $25,043".to_string())
        }
    }

    struct Reply {
        status: &'static str,
        body: String,
    }

    fn sse(events: &[&str]) -> Reply {
        let mut body = String::new();
        for event in events {
            body.push_str("data: ");
            body.push_str(event);
            body.push_str("\n\n");
        }
        body.push_str("data: [DONE]\n\n");
        Reply {
            status: "200 OK",
            body,
        }
    }

    fn content(text: &str) -> String {
        serde_json::json!({"choices": [{"delta": {"content": text}, "finish_reason": null}]})
            .to_string()
    }

    fn tool_call(arguments: &str) -> String {
        serde_json::json!({"choices": [{"delta": {"tool_calls": [{
            "index": 0,
            "id": "call_1",
            "type": "function",
            "function": {"name": DATASOURCE_TOOL_NAME, "arguments": arguments}
        }]}}]})
        .to_string()
    }

    fn tool_args(arguments: &str) -> String {
        serde_json::json!({"choices": [{"delta": {"tool_calls": [{
            "index": 0,
            "function": {"arguments": arguments}
        }]}}]})
        .to_string()
    }

    /// Serve one scripted reply per connection and record request bodies.
    async fn serve(replies: Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = bodies.clone();

        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let body = read_request_body(&mut socket).await;
                recorded.lock().unwrap().push(body);

                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    reply.status,
                    reply.body.len()
                );
                socket.write_all(head.as_bytes()).await.unwrap();
                socket.write_all(reply.body.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{}", addr), bodies)
    }

    async fn read_request_body(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return String::from_utf8_lossy(&buf[end + 4..end + 4 + length]).to_string();
                }
            }
            if n == 0 {
                return String::new();
            }
        }
    }

    fn agent(base_url: String, max_steps: usize, tool: Arc<FakeTool>) -> OpenAiAgent {
        let settings = ModelSettings {
            name: "gpt-4.1".to_string(),
            api_key: "sk-test".to_string(),
            base_url,
            temperature: 0.0,
            max_steps,
        };
        OpenAiAgent::new(settings, tool).unwrap()
    }

    async fn collect(mut stream: SnapshotStream) -> Vec<Result<Snapshot, AgentError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn tool_call_then_answer() {
        let (url, bodies) = serve(vec![
            sse(&[&tool_call("{\"query\":"), &tool_args("\"top customers by sales\"}")]),
            sse(&[&content("Top customer"), &content(" is Sean Miller.")]),
        ])
        .await;
        let tool = Arc::new(FakeTool::default());
        let agent = agent(url, 25, tool.clone());

        let question = [Message::user("Show me the top customers by sales")];
        let items = collect(agent.stream(&question).await.unwrap()).await;
        let snapshots: Vec<Snapshot> = items.into_iter().map(Result::unwrap).collect();

        assert_eq!(snapshots[0].messages, question.to_vec());
        assert!(snapshots.iter().any(|s| {
            s.latest_message()
                .is_some_and(|m| m.role == Role::Tool && m.content == "Sean Miller: $25,043")
        }));
        let last = snapshots.last().unwrap();
        assert_eq!(last.latest_agent_text(), Some("Top customer is Sean Miller."));

        assert_eq!(
            *tool.questions.lock().unwrap(),
            vec!["top customers by sales".to_string()]
        );

        let bodies = bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        let first: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(first["model"], "gpt-4.1");
        assert_eq!(first["stream"], true);
        assert_eq!(first["messages"][0]["role"], "system");
        let second: serde_json::Value = serde_json::from_str(&bodies[1]).unwrap();
        let roles: Vec<_> = second["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "tool"]);
        assert_eq!(second["messages"][3]["tool_call_id"], "call_1");
    }

    #[tokio::test]
    async fn non_success_status_is_request_error() {
        let (url, _) = serve(vec![Reply {
            status: "401 Unauthorized",
            body: "{\"error\":\"invalid api key\"}".to_string(),
        }])
        .await;
        let agent = agent(url, 25, Arc::new(FakeTool::default()));

        let items = collect(agent.stream(&[Message::user("q")]).await.unwrap()).await;

        let err = items.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(err, AgentError::Request(ref body) if body.contains("invalid api key")));
    }

    #[tokio::test]
    async fn tool_failure_is_fed_back_to_model() {
        let (url, bodies) = serve(vec![
            sse(&[&tool_call("{\"query\":\"q\"}")]),
            sse(&[&content("The data source is unavailable.")]),
        ])
        .await;
        let tool = Arc::new(FakeTool {
            fail: true,
            ..FakeTool::default()
        });
        let agent = agent(url, 25, tool);

        let items = collect(agent.stream(&[Message::user("q")]).await.unwrap()).await;

        assert!(items.iter().all(Result::is_ok));
        let second: serde_json::Value =
            serde_json::from_str(&bodies.lock().unwrap()[1]).unwrap();
        assert!(
            second["messages"][3]["content"]
                .as_str()
                .unwrap()
                .contains("token expired")
        );
    }

    #[tokio::test]
    async fn step_limit_is_enforced() {
        let (url, _) = serve(vec![sse(&[&tool_call("{\"query\":\"q\"}")])]).await;
        let agent = agent(url, 1, Arc::new(FakeTool::default()));

        let items = collect(agent.stream(&[Message::user("q")]).await.unwrap()).await;

        assert!(matches!(
            items.last(),
            Some(Err(AgentError::TooManySteps(1)))
        ));
    }
}
