//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for datachat
#[derive(Parser, Debug)]
#[command(name = "datachat")]
#[command(author, version, about = "Chat with an AI analyst about the Superstore dataset")]
#[command(long_about = r#"
datachat answers questions about the Tableau Superstore dataset. An AI
analyst queries the published data source on your behalf and explains
what it finds.

Configuration is read from (in priority order):
1. Environment variables (a .env file in the working directory is loaded first)
2. --config <path>                  Explicit config file
3. ./datachat.toml                  Project-level config
4. ~/.config/datachat/config.toml   Global config

Required environment variables:
  TABLEAU_DOMAIN, TABLEAU_SITE, TABLEAU_JWT_CLIENT_ID, TABLEAU_JWT_SECRET_ID,
  TABLEAU_JWT_SECRET, TABLEAU_API_VERSION, TABLEAU_USER, DATASOURCE_LUID,
  OPENAI_API_KEY

Example:
  datachat
  datachat ask "Show me the top customers by sales"
  datachat serve --addr 127.0.0.1:8000
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment only)
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Write a JSONL transcript of every turn into this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat session (default)
    Chat {
        /// Suppress the progress spinner
        #[arg(short, long)]
        quiet: bool,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,
    },

    /// Serve the web chat page and JSON API
    Serve {
        /// Address to listen on (overrides configuration)
        #[arg(long, value_name = "HOST:PORT")]
        addr: Option<String>,
    },
}

impl Cli {
    /// The subcommand to run, defaulting to interactive chat.
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Chat { quiet: false })
    }
}
