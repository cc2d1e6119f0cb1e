//! Configuration loading for datachat
//!
//! Settings are merged from several sources. The priority order (highest to lowest):
//!
//! 1. Environment variables (optionally seeded from a `.env` file)
//! 2. `--config <path>` specified file
//! 3. Project root: `./datachat.toml` or `./.datachat.toml`
//! 4. Global: `$XDG_CONFIG_HOME/datachat/config.toml`
//! 5. Default values
//!
//! The merged [`FileConfig`] is validated once into an [`AppConfig`].

mod file_config;
mod loader;
mod settings;

pub use file_config::{
    ENV_BINDINGS, FileConfig, FileDatasourceToolConfig, FileModelConfig, FileReplConfig,
    FileServerConfig, FileTableauConfig,
};
pub use loader::ConfigLoader;
pub use settings::{
    AppConfig, ConfigError, ConfigProblem, DatasourceToolSettings, ModelSettings, TableauSettings,
};
