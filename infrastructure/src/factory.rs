//! Construction of the production agent from validated configuration.

use crate::config::AppConfig;
use crate::datasource::CommandDatasourceTool;
use crate::openai::OpenAiAgent;
use datachat_application::ports::agent::{Agent, AgentError};
use std::sync::Arc;
use tracing::info;

/// Build the shared agent: the configured model plus the datasource command.
pub fn build_agent(config: &AppConfig) -> Result<Arc<dyn Agent>, AgentError> {
    let tool = CommandDatasourceTool::from_settings(&config.datasource_tool, &config.tableau);
    let agent = OpenAiAgent::new(config.model.clone(), Arc::new(tool))?;

    info!(
        "Agent ready: model {} via {}, datasource tool '{}'",
        agent.model(),
        config.model.base_url,
        config.datasource_tool.program
    );
    Ok(Arc::new(agent))
}
