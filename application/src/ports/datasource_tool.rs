//! Datasource tool port
//!
//! The agent answers data questions by calling a tool that queries the
//! BI data source. Query translation and authentication to the BI service
//! happen behind this port.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by a datasource query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Failed to start datasource tool: {0}")]
    Spawn(String),

    #[error("Datasource tool exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("Datasource tool timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// Answers one natural-language question against the data source.
#[async_trait]
pub trait DatasourceTool: Send + Sync {
    /// Run the query; the returned text is handed back to the model verbatim.
    async fn query(&self, question: &str) -> Result<String, ToolError>;
}
