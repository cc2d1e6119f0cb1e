//! CLI entrypoint for datachat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use datachat_application::{
    AskOnceUseCase, ChatSession, ConversationLogger, NoConversationLogger,
};
use datachat_infrastructure::{ConfigLoader, JsonlConversationLogger, build_agent};
use datachat_presentation::{AppState, ChatRepl, Cli, Command, ConsoleReplyPrinter, serve};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // .env first so RUST_LOG and credentials from it are visible below
    ConfigLoader::load_dotenv();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting datachat");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    let config = file_config.validate()?;

    // === Dependency Injection ===
    let agent = build_agent(&config)?;

    let conversation_logger: Arc<dyn ConversationLogger> = match &cli.log_dir {
        Some(dir) => {
            let logger = JsonlConversationLogger::in_dir(dir).with_context(|| {
                format!("Could not create transcript in {}", dir.display())
            })?;
            info!("Transcript: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    };

    match cli.command_or_default() {
        Command::Chat { quiet } => {
            let session = ChatSession::new(agent).with_conversation_logger(conversation_logger);
            let mut repl = ChatRepl::new(session)
                .with_progress(!quiet && config.repl.show_progress)
                .with_history_path(config.repl.history_file.as_ref().map(PathBuf::from));

            repl.run().await?;
        }
        Command::Ask { question } => {
            let use_case =
                AskOnceUseCase::new(agent).with_conversation_logger(conversation_logger);
            let printer = ConsoleReplyPrinter::new(config.repl.show_progress);

            let reply = use_case.execute(&question, &printer).await?;
            if reply.is_empty() {
                println!("(no response)");
            }
        }
        Command::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.server_addr.clone());
            let use_case =
                AskOnceUseCase::new(agent).with_conversation_logger(conversation_logger);

            serve(&addr, AppState::new(use_case))
                .await
                .with_context(|| format!("Web server on {} failed", addr))?;
        }
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// Verbosity picks the default level; `RUST_LOG` overrides it. With a log
/// directory, diagnostics are also written to a daily rolling file there.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "datachat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
