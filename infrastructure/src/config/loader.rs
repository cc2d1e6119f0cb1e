//! Configuration file loader with multi-source merging

use super::file_config::{ENV_BINDINGS, FileConfig};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

const PROJECT_FILES: [&str; 2] = ["datachat.toml", ".datachat.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `.env` from the working directory (or a parent) into the process
    /// environment. Variables already set are left untouched.
    pub fn load_dotenv() {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
    }

    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::merge_env(figment).extract().map_err(Box::new)
    }

    /// Load defaults plus environment only (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        Self::merge_env(figment).extract().map_err(Box::new)
    }

    /// Overlay the bound environment variables as plain strings.
    fn merge_env(mut figment: Figment) -> Figment {
        for (var, key) in ENV_BINDINGS {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("datachat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment variables and .env");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./datachat.toml or ./.datachat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("datachat"));
    }

    #[test]
    fn test_project_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "datachat.toml",
                r#"
[model]
name = "gpt-4.1-mini"
max_steps = 8
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.model.name, "gpt-4.1-mini");
            assert_eq!(config.model.max_steps, 8);
            assert_eq!(config.server.addr, "0.0.0.0:8000");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[tableau]
site = "from-file"
api_version = "3.19"
"#,
            )?;
            jail.set_env("TABLEAU_SITE", "from-env");
            jail.set_env("OPENAI_API_KEY", "sk-env");

            let config = ConfigLoader::load(Some(Path::new("custom.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.tableau.site.as_deref(), Some("from-env"));
            assert_eq!(config.tableau.api_version.as_deref(), Some("3.19"));
            assert_eq!(config.model.api_key.as_deref(), Some("sk-env"));
            Ok(())
        });
    }

    #[test]
    fn test_numeric_looking_env_stays_a_string() {
        Jail::expect_with(|jail| {
            jail.set_env("TABLEAU_API_VERSION", "3.21");

            let config = ConfigLoader::load_defaults().map_err(|e| e.to_string())?;
            assert_eq!(config.tableau.api_version.as_deref(), Some("3.21"));
            Ok(())
        });
    }

    #[test]
    fn test_load_defaults_ignores_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("datachat.toml", "[model]\nname = \"other\"\n")?;

            let config = ConfigLoader::load_defaults().map_err(|e| e.to_string())?;
            assert_eq!(config.model.name, "gpt-4.1");
            Ok(())
        });
    }
}
