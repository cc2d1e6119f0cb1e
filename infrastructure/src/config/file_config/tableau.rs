//! BI service configuration (`[tableau]` section)
//!
//! Every connection field is normally supplied through the environment;
//! a TOML file may carry the non-secret ones.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTableauConfig {
    pub domain: Option<String>,
    pub site: Option<String>,
    pub jwt_client_id: Option<String>,
    pub jwt_secret_id: Option<String>,
    pub jwt_secret: Option<String>,
    pub api_version: Option<String>,
    pub user: Option<String>,
    pub datasource_luid: Option<String>,
    /// Model the datasource tool uses for its own query writing
    pub tooling_model: String,
}

impl Default for FileTableauConfig {
    fn default() -> Self {
        Self {
            domain: None,
            site: None,
            jwt_client_id: None,
            jwt_secret_id: None,
            jwt_secret: None,
            api_version: None,
            user: None,
            datasource_luid: None,
            tooling_model: "gpt-4.1-nano".to_string(),
        }
    }
}
