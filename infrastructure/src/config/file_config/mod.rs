//! Raw configuration data types
//!
//! These structs mirror the TOML file layout. Environment variables are
//! merged onto the same structure by the loader, then [`FileConfig::validate`]
//! turns the raw data into a [`AppConfig`] in one step.

mod datasource_tool;
mod model;
mod repl;
mod server;
mod tableau;

pub use datasource_tool::FileDatasourceToolConfig;
pub use model::FileModelConfig;
pub use repl::FileReplConfig;
pub use server::FileServerConfig;
pub use tableau::FileTableauConfig;

use super::settings::{
    AppConfig, ConfigError, ConfigProblem, DatasourceToolSettings, ModelSettings, TableauSettings,
};
use serde::{Deserialize, Serialize};

/// Environment variable → config key bindings.
///
/// Each variable, when set, overrides the key at the given dotted path.
pub const ENV_BINDINGS: &[(&str, &str)] = &[
    ("TABLEAU_DOMAIN", "tableau.domain"),
    ("TABLEAU_SITE", "tableau.site"),
    ("TABLEAU_JWT_CLIENT_ID", "tableau.jwt_client_id"),
    ("TABLEAU_JWT_SECRET_ID", "tableau.jwt_secret_id"),
    ("TABLEAU_JWT_SECRET", "tableau.jwt_secret"),
    ("TABLEAU_API_VERSION", "tableau.api_version"),
    ("TABLEAU_USER", "tableau.user"),
    ("DATASOURCE_LUID", "tableau.datasource_luid"),
    ("OPENAI_API_KEY", "model.api_key"),
    ("OPENAI_BASE_URL", "model.base_url"),
    ("DATACHAT_MODEL", "model.name"),
    ("DATACHAT_TOOLING_MODEL", "tableau.tooling_model"),
];

/// Complete file configuration (raw structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model provider settings
    pub model: FileModelConfig,
    /// BI service connection
    pub tableau: FileTableauConfig,
    /// External datasource query command
    pub datasource_tool: FileDatasourceToolConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Web front end settings
    pub server: FileServerConfig,
}

/// Take a required value, recording `env_name` when it is absent or blank.
fn require(value: &Option<String>, env_name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            missing.push(env_name);
            String::new()
        }
    }
}

impl FileConfig {
    /// Validate the configuration once, reporting every missing or invalid field together.
    pub fn validate(&self) -> Result<AppConfig, ConfigError> {
        let mut missing = Vec::new();
        let t = &self.tableau;

        let tableau = TableauSettings {
            domain: require(&t.domain, "TABLEAU_DOMAIN", &mut missing),
            site: require(&t.site, "TABLEAU_SITE", &mut missing),
            jwt_client_id: require(&t.jwt_client_id, "TABLEAU_JWT_CLIENT_ID", &mut missing),
            jwt_secret_id: require(&t.jwt_secret_id, "TABLEAU_JWT_SECRET_ID", &mut missing),
            jwt_secret: require(&t.jwt_secret, "TABLEAU_JWT_SECRET", &mut missing),
            api_version: require(&t.api_version, "TABLEAU_API_VERSION", &mut missing),
            user: require(&t.user, "TABLEAU_USER", &mut missing),
            datasource_luid: require(&t.datasource_luid, "DATASOURCE_LUID", &mut missing),
            tooling_model: t.tooling_model.clone(),
        };
        let api_key = require(&self.model.api_key, "OPENAI_API_KEY", &mut missing);

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(ConfigProblem::Missing(missing));
        }
        if self.model.name.trim().is_empty() {
            problems.push(ConfigProblem::Field {
                field: "model.name",
                reason: "model name cannot be empty".to_string(),
            });
        }
        if self.model.max_steps == 0 {
            problems.push(ConfigProblem::Field {
                field: "model.max_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.datasource_tool.program.trim().is_empty() {
            problems.push(ConfigProblem::Field {
                field: "datasource_tool.program",
                reason: "program cannot be empty".to_string(),
            });
        }
        if !problems.is_empty() {
            return Err(ConfigError::Invalid(problems));
        }

        Ok(AppConfig {
            model: ModelSettings {
                name: self.model.name.clone(),
                api_key,
                base_url: self.model.base_url.trim_end_matches('/').to_string(),
                temperature: self.model.temperature,
                max_steps: self.model.max_steps,
            },
            tableau,
            datasource_tool: DatasourceToolSettings {
                program: self.datasource_tool.program.clone(),
                args: self.datasource_tool.args.clone(),
                working_dir: self.datasource_tool.working_dir.clone(),
            },
            repl: self.repl.clone(),
            server_addr: self.server.addr.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FileConfig {
        let mut config = FileConfig::default();
        config.tableau = FileTableauConfig {
            domain: Some("https://prod-useast-a.online.tableau.com".to_string()),
            site: Some("superstore".to_string()),
            jwt_client_id: Some("client".to_string()),
            jwt_secret_id: Some("secret-id".to_string()),
            jwt_secret: Some("secret".to_string()),
            api_version: Some("3.21".to_string()),
            user: Some("analyst@example.com".to_string()),
            datasource_luid: Some("0f9b4c2e-luid".to_string()),
            ..FileTableauConfig::default()
        };
        config.model.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[model]
name = "gpt-4.1-mini"

[datasource_tool]
program = "/usr/local/bin/vds-query"
args = ["--json"]

[repl]
show_progress = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "gpt-4.1-mini");
        assert_eq!(config.model.max_steps, 25);
        assert_eq!(config.datasource_tool.args, vec!["--json".to_string()]);
        assert!(!config.repl.show_progress);
        assert_eq!(config.server.addr, "0.0.0.0:8000");
        assert_eq!(config.tableau.tooling_model, "gpt-4.1-nano");
    }

    #[test]
    fn test_validate_complete_config() {
        let app = complete().validate().unwrap();
        assert_eq!(app.model.name, "gpt-4.1");
        assert_eq!(app.model.api_key, "sk-test");
        assert_eq!(app.tableau.api_version, "3.21");
        assert_eq!(app.model.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_validate_reports_all_missing_names() {
        let err = FileConfig::default().validate().unwrap_err();
        assert_eq!(
            err.missing(),
            vec![
                "TABLEAU_DOMAIN",
                "TABLEAU_SITE",
                "TABLEAU_JWT_CLIENT_ID",
                "TABLEAU_JWT_SECRET_ID",
                "TABLEAU_JWT_SECRET",
                "TABLEAU_API_VERSION",
                "TABLEAU_USER",
                "DATASOURCE_LUID",
                "OPENAI_API_KEY",
            ]
        );
        assert!(err.to_string().contains("TABLEAU_SITE, TABLEAU_JWT_CLIENT_ID"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut config = complete();
        config.tableau.user = Some("   ".to_string());

        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid(vec![ConfigProblem::Missing(vec!["TABLEAU_USER"])])
        );
    }

    #[test]
    fn test_zero_max_steps_is_invalid() {
        let mut config = complete();
        config.model.max_steps = 0;

        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid(vec![ConfigProblem::Field {
                field: "model.max_steps",
                reason: "must be at least 1".to_string(),
            }])
        );
    }

    #[test]
    fn test_missing_and_invalid_fields_reported_together() {
        let mut config = FileConfig::default();
        config.model.max_steps = 0;
        config.datasource_tool.program = " ".to_string();

        let err = config.validate().unwrap_err();
        let ConfigError::Invalid(problems) = &err else {
            panic!("expected Invalid, got {err:?}");
        };
        assert_eq!(problems.len(), 3);
        assert!(matches!(&problems[0], ConfigProblem::Missing(names) if names.len() == 9));

        let message = err.to_string();
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(message.contains("model.max_steps"));
        assert!(message.contains("datasource_tool.program"));
    }
}
