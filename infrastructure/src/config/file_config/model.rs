//! Model provider configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};

/// Raw model provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Chat model driving the agent
    pub name: String,
    /// API key (normally supplied through `OPENAI_API_KEY`)
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on model calls within one turn
    pub max_steps: usize,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt-4.1".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.0,
            max_steps: 25,
        }
    }
}
