//! Datasource tool backed by an external command.
//!
//! The question is written to the command's stdin and its stdout is the
//! answer. BI connection settings are passed through the environment so the
//! command can authenticate on its own.

use crate::config::{DatasourceToolSettings, TableauSettings};
use async_trait::async_trait;
use datachat_application::ports::datasource_tool::{DatasourceTool, ToolError};
use datachat_domain::util::{preview, truncate_str};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default timeout for one query (2 minutes)
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Maximum output handed back to the model (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Runs `program args...` once per question.
pub struct CommandDatasourceTool {
    program: String,
    args: Vec<String>,
    working_dir: Option<String>,
    env: Vec<(&'static str, String)>,
    timeout: Duration,
}

impl CommandDatasourceTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build from validated settings.
    pub fn from_settings(tool: &DatasourceToolSettings, tableau: &TableauSettings) -> Self {
        let mut this = Self::new(tool.program.clone())
            .with_args(tool.args.clone())
            .with_env(tableau.env_vars());
        this.working_dir = tool.working_dir.clone();
        this
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, env: Vec<(&'static str, String)>) -> Self {
        self.env = env;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl DatasourceTool for CommandDatasourceTool {
    async fn query(&self, question: &str) -> Result<String, ToolError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ToolError::InvalidArguments(
                "question cannot be empty".to_string(),
            ));
        }

        info!("Datasource query: {}", preview(question, 100));
        let start = Instant::now();

        let mut child = self
            .command()
            .spawn()
            .map_err(|e| ToolError::Spawn(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(format!("{}\n", question).as_bytes())
                .await
                .map_err(|e| ToolError::Spawn(format!("writing question: {}", e)))?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ToolError::Timeout(self.timeout))?
            .map_err(|e| ToolError::Spawn(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            "Datasource tool finished in {}ms ({} bytes)",
            start.elapsed().as_millis(),
            stdout.len()
        );

        if !output.status.success() {
            let status = output.status.code().unwrap_or(-1);
            warn!("Datasource tool exited with status {}", status);
            return Err(ToolError::Failed {
                status,
                stderr: truncate_str(stderr.trim(), MAX_OUTPUT_SIZE).to_string(),
            });
        }

        let answer = truncate_str(stdout.trim(), MAX_OUTPUT_SIZE);
        if answer.len() < stdout.trim().len() {
            return Ok(format!("{}\n... (output truncated)", answer));
        }
        Ok(answer.to_string())
    }
}
