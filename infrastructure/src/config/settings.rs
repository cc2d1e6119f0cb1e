//! Validated application configuration.
//!
//! Produced once at startup by [`FileConfig::validate`](super::FileConfig::validate)
//! and passed by value to the components that need it.

use super::file_config::FileReplConfig;
use std::fmt;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Every problem found by validation, in the order checked
    #[error("{}", join_problems(.0))]
    Invalid(Vec<ConfigProblem>),

    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    /// Missing variable names across all problems.
    pub fn missing(&self) -> Vec<&'static str> {
        match self {
            ConfigError::Invalid(problems) => problems
                .iter()
                .flat_map(|p| match p {
                    ConfigProblem::Missing(names) => names.clone(),
                    ConfigProblem::Field { .. } => Vec::new(),
                })
                .collect(),
            ConfigError::Load(_) => Vec::new(),
        }
    }
}

/// A single validation problem
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {field}: {reason}")]
    Field { field: &'static str, reason: String },
}

fn join_problems(problems: &[ConfigProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Complete, validated configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelSettings,
    pub tableau: TableauSettings,
    pub datasource_tool: DatasourceToolSettings,
    pub repl: FileReplConfig,
    pub server_addr: String,
}

/// Model provider settings
#[derive(Clone)]
pub struct ModelSettings {
    pub name: String,
    pub api_key: String,
    /// Base URL without trailing slash
    pub base_url: String,
    pub temperature: f32,
    pub max_steps: usize,
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("name", &self.name)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

/// BI service connection, forwarded to the datasource tool
#[derive(Clone)]
pub struct TableauSettings {
    pub domain: String,
    pub site: String,
    pub jwt_client_id: String,
    pub jwt_secret_id: String,
    pub jwt_secret: String,
    pub api_version: String,
    pub user: String,
    pub datasource_luid: String,
    pub tooling_model: String,
}

impl TableauSettings {
    /// Environment handed to the external datasource command.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TABLEAU_DOMAIN", self.domain.clone()),
            ("TABLEAU_SITE", self.site.clone()),
            ("TABLEAU_JWT_CLIENT_ID", self.jwt_client_id.clone()),
            ("TABLEAU_JWT_SECRET_ID", self.jwt_secret_id.clone()),
            ("TABLEAU_JWT_SECRET", self.jwt_secret.clone()),
            ("TABLEAU_API_VERSION", self.api_version.clone()),
            ("TABLEAU_USER", self.user.clone()),
            ("DATASOURCE_LUID", self.datasource_luid.clone()),
            ("TOOLING_LLM_MODEL", self.tooling_model.clone()),
        ]
    }
}

impl fmt::Debug for TableauSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableauSettings")
            .field("domain", &self.domain)
            .field("site", &self.site)
            .field("jwt_client_id", &self.jwt_client_id)
            .field("jwt_secret_id", &self.jwt_secret_id)
            .field("jwt_secret", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("user", &self.user)
            .field("datasource_luid", &self.datasource_luid)
            .field("tooling_model", &self.tooling_model)
            .finish()
    }
}

/// External datasource command
#[derive(Debug, Clone)]
pub struct DatasourceToolSettings {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let model = ModelSettings {
            name: "gpt-4.1".to_string(),
            api_key: "sk-very-secret".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.0,
            max_steps: 25,
        };
        let rendered = format!("{model:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_missing_display_lists_names() {
        let err = ConfigError::Invalid(vec![ConfigProblem::Missing(vec![
            "TABLEAU_DOMAIN",
            "OPENAI_API_KEY",
        ])]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: TABLEAU_DOMAIN, OPENAI_API_KEY"
        );
    }

    #[test]
    fn test_display_joins_every_problem() {
        let err = ConfigError::Invalid(vec![
            ConfigProblem::Missing(vec!["OPENAI_API_KEY"]),
            ConfigProblem::Field {
                field: "model.max_steps",
                reason: "must be at least 1".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: OPENAI_API_KEY; \
             invalid value for model.max_steps: must be at least 1"
        );
        assert_eq!(err.missing(), vec!["OPENAI_API_KEY"]);
    }
}
