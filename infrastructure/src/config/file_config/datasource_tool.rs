//! Datasource tool configuration (`[datasource_tool]` section)

use serde::{Deserialize, Serialize};

/// External command that answers datasource questions
///
/// ```toml
/// [datasource_tool]
/// program = "tableau-datasource-qa"
/// args = ["--format", "markdown"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatasourceToolConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the command (defaults to the current one)
    pub working_dir: Option<String>,
}

impl Default for FileDatasourceToolConfig {
    fn default() -> Self {
        Self {
            program: "tableau-datasource-qa".to_string(),
            args: Vec::new(),
            working_dir: None,
        }
    }
}
