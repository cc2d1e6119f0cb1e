//! Console rendering of a streamed agent reply
//!
//! Partial replies usually grow by appending text, in which case only the
//! new suffix is printed. When the agent replaces its text (for instance the
//! final answer after a tool call), the new text is printed on a fresh line.

use colored::Colorize;
use datachat_application::ports::reply_observer::ReplyObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// How a reply update is rendered relative to what is already on screen.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplyRender<'a> {
    /// Nothing new to print
    Unchanged,
    /// Print this suffix after the current text
    Append(&'a str),
    /// Start a new line with the full text
    Replace(&'a str),
}

/// Decide how to move the screen from `shown` to `next`.
pub fn render_update<'a>(shown: &str, next: &'a str) -> ReplyRender<'a> {
    if next == shown {
        ReplyRender::Unchanged
    } else if let Some(suffix) = next.strip_prefix(shown) {
        ReplyRender::Append(suffix)
    } else {
        ReplyRender::Replace(next)
    }
}

#[derive(Default)]
struct PrinterState {
    shown: String,
    spinner: Option<ProgressBar>,
}

/// Prints reply updates to stdout as they stream in.
pub struct ConsoleReplyPrinter {
    show_progress: bool,
    state: Mutex<PrinterState>,
}

impl ConsoleReplyPrinter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            state: Mutex::new(PrinterState::default()),
        }
    }

    fn spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message("Analyzing the Superstore data...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl ReplyObserver for ConsoleReplyPrinter {
    fn on_turn_start(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.shown.clear();
        if self.show_progress {
            state.spinner = Some(Self::spinner());
        }
    }

    fn on_reply_update(&self, text: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let first = state.shown.is_empty();
        if let Some(pb) = state.spinner.take() {
            pb.finish_and_clear();
        }

        let mut out = std::io::stdout().lock();
        let render = render_update(&state.shown, text);
        match render {
            ReplyRender::Unchanged => return,
            ReplyRender::Append(suffix) => {
                if first {
                    let _ = write!(out, "{} ", "Agent:".cyan().bold());
                }
                let _ = write!(out, "{}", suffix);
            }
            ReplyRender::Replace(full) => {
                let _ = write!(out, "\n{} {}", "Agent:".cyan().bold(), full);
            }
        }
        let _ = out.flush();

        state.shown.clear();
        state.shown.push_str(text);
    }

    fn on_turn_end(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if let Some(pb) = state.spinner.take() {
            pb.finish_and_clear();
        }
        if !state.shown.is_empty() {
            println!();
            println!();
        }
        state.shown.clear();
    }
}
