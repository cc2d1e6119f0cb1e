//! Wire types for the OpenAI-compatible chat completions API.
//!
//! Covers the subset the agent needs: streamed requests with one function
//! tool, SSE `data:` framing, and incremental accumulation of content and
//! tool-call fragments into one complete assistant step.

use datachat_domain::{AgentPromptTemplate, DATASOURCE_TOOL_NAME, Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the single argument the datasource function takes.
pub const QUERY_ARGUMENT: &str = "query";

/// One message in the request transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text("assistant", content)
    }

    /// Assistant step that requested tool calls.
    pub fn assistant_calls(content: String, tool_calls: Vec<WireToolCall>) -> Self {
        Self {
            role: "assistant",
            content: (!content.is_empty()).then_some(content),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool",
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }

    fn text(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Convert a conversation message. Tool messages carry no call id and
    /// cannot be replayed, so they are skipped.
    pub fn from_message(message: &Message) -> Option<Self> {
        match message.role {
            Role::User => Some(Self::user(message.content.clone())),
            Role::Agent => Some(Self::assistant(message.content.clone())),
            Role::Tool => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    pub arguments: String,
}

impl WireFunctionCall {
    /// Extract the question from the JSON argument string.
    pub fn query_argument(&self) -> Result<String, String> {
        let args: Value = serde_json::from_str(&self.arguments)
            .map_err(|e| format!("arguments are not valid JSON: {}", e))?;
        args.get(QUERY_ARGUMENT)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| format!("missing string argument '{}'", QUERY_ARGUMENT))
    }
}

/// Streamed chat completion request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [WireMessage],
    pub temperature: f32,
    pub stream: bool,
    pub tools: Vec<Value>,
}

/// Function schema advertised for the datasource tool.
pub fn datasource_tool_schema() -> Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": DATASOURCE_TOOL_NAME,
            "description": AgentPromptTemplate::datasource_tool_description(),
            "parameters": {
                "type": "object",
                "properties": {
                    QUERY_ARGUMENT: {
                        "type": "string",
                        "description": "The data question in natural language"
                    }
                },
                "required": [QUERY_ARGUMENT]
            }
        }
    })
}

// ==================== Streaming chunks ====================

#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallDelta>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: usize,
    pub id: Option<String>,
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Deserialize)]
pub struct FunctionDelta {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// A decoded SSE event of interest.
#[derive(Debug, PartialEq)]
pub enum SseData {
    /// JSON payload of a `data:` line
    Json(String),
    /// The `[DONE]` sentinel
    Done,
}

/// Splits a byte stream into SSE `data:` payloads.
///
/// Bytes are buffered until a full line is available so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Feed one network chunk and return the payloads it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseData> {
        self.pending.extend_from_slice(bytes);

        let mut out = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(data) = parse_data_line(line.trim_end_matches(['\r', '\n'])) {
                out.push(data);
            }
        }
        out
    }

    /// Flush a trailing line that had no newline.
    pub fn finish(&mut self) -> Option<SseData> {
        let rest = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&rest);
        parse_data_line(line.trim())
    }
}

fn parse_data_line(line: &str) -> Option<SseData> {
    let data = line.strip_prefix("data:")?.trim_start();
    match data {
        "" => None,
        "[DONE]" => Some(SseData::Done),
        json => Some(SseData::Json(json.to_string())),
    }
}

// ==================== Step accumulation ====================

#[derive(Debug, Default)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Upper bound on parallel tool calls in one assistant step.
pub const MAX_TOOL_CALLS_PER_STEP: usize = 64;

/// Assembles one assistant step from streamed deltas.
#[derive(Debug, Default)]
pub struct StepAccumulator {
    content: String,
    tool_calls: Vec<PendingToolCall>,
}

impl StepAccumulator {
    /// Apply a delta. Returns `true` when visible content changed.
    ///
    /// A tool call index may only name an existing call or the next new one.
    pub fn apply(&mut self, delta: Delta) -> Result<bool, String> {
        for call in delta.tool_calls {
            if call.index > self.tool_calls.len() || call.index >= MAX_TOOL_CALLS_PER_STEP {
                return Err(format!("invalid tool call index {}", call.index));
            }
            if call.index == self.tool_calls.len() {
                self.tool_calls.push(PendingToolCall::default());
            }
            let pending = &mut self.tool_calls[call.index];
            if let Some(id) = call.id {
                pending.id = id;
            }
            if let Some(function) = call.function {
                if let Some(name) = function.name {
                    pending.name.push_str(&name);
                }
                if let Some(arguments) = function.arguments {
                    pending.arguments.push_str(&arguments);
                }
            }
        }

        match delta.content {
            Some(text) if !text.is_empty() => {
                self.content.push_str(&text);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Finish the step, returning its text and any requested tool calls.
    pub fn finish(self) -> (String, Vec<WireToolCall>) {
        let calls = self
            .tool_calls
            .into_iter()
            .enumerate()
            .filter(|(_, call)| !call.name.is_empty())
            .map(|(i, call)| WireToolCall {
                id: if call.id.is_empty() {
                    format!("call_{}", i)
                } else {
                    call.id
                },
                kind: "function".to_string(),
                function: WireFunctionCall {
                    name: call.name,
                    arguments: call.arguments,
                },
            })
            .collect();
        (self.content, calls)
    }
}
