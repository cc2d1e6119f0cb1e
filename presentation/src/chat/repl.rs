//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::ConsoleReplyPrinter;
use colored::Colorize;
use datachat_application::{ChatSession, TurnOutcome};
use datachat_domain::{ChatHistory, Role};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use tracing::debug;

/// What the loop should do after a line was handled
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    session: ChatSession,
    printer: ConsoleReplyPrinter,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            printer: ConsoleReplyPrinter::new(true),
            history_path: Self::default_history_path(),
        }
    }

    /// Set whether to show the progress spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.printer = ConsoleReplyPrinter::new(show);
        self
    }

    /// Override where line-editor history is persisted
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_path = path;
        }
        self
    }

    fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("datachat").join("history.txt"))
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(&format!("{} ", "You:".green().bold())) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.trim());
                    }
                    if self.process_line(&line).await == LineOutcome::Exit {
                        println!("Goodbye!");
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path
            && let Err(e) = rl.save_history(path)
        {
            debug!("Could not save line history to {}: {}", path.display(), e);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Agent Superstore - Data Chat         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Ask anything about the Superstore dataset: sales, profit,");
        println!("customers, products, regions or shipping.");
        println!();
        println!("Type 'quit' or 'exit' to leave, /help for commands.");
        println!();
    }

    async fn process_line(&mut self, line: &str) -> LineOutcome {
        let trimmed = line.trim();
        if trimmed.starts_with('/') {
            return self.handle_command(trimmed);
        }

        match self.session.handle(trimmed, &self.printer).await {
            Ok(TurnOutcome::Quit) => LineOutcome::Exit,
            Ok(TurnOutcome::Ignored) | Ok(TurnOutcome::Replied(_)) => LineOutcome::Continue,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                eprintln!();
                LineOutcome::Continue
            }
        }
    }

    /// Handle slash commands.
    fn handle_command(&mut self, cmd: &str) -> LineOutcome {
        match cmd {
            "/quit" | "/exit" | "/q" => LineOutcome::Exit,
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?     - Show this help");
                println!("  /history          - Show the conversation so far");
                println!("  /clear            - Start a new conversation");
                println!("  /quit, /exit, /q  - Exit chat (or type quit / exit)");
                println!();
                LineOutcome::Continue
            }
            "/history" => {
                println!();
                println!("{}", format_history(self.session.history()));
                LineOutcome::Continue
            }
            "/clear" => {
                self.session.clear();
                println!("Conversation cleared.");
                LineOutcome::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                LineOutcome::Continue
            }
        }
    }
}

/// Render the history one message per paragraph.
fn format_history(history: &ChatHistory) -> String {
    if history.is_empty() {
        return "(no messages yet)".to_string();
    }

    let mut out = String::new();
    for message in history.messages() {
        let label = match message.role {
            Role::User => "You:".green().bold(),
            Role::Agent => "Agent:".cyan().bold(),
            Role::Tool => "Tool:".yellow().bold(),
        };
        out.push_str(&format!("{} {}\n\n", label, message.content));
    }
    out
}
