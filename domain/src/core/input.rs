//! User input value object

/// Keywords that end an interactive chat loop (compared case-insensitively)
pub const QUIT_KEYWORDS: &[&str] = &["quit", "exit"];

/// A classified line of user input (Value Object)
///
/// Front ends read raw lines; this decides whether a line is a turn for the
/// agent, something to skip, or a request to leave the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// `quit` / `exit`, in any letter case
    Quit,
    /// Empty or whitespace-only line
    Empty,
    /// Anything else; holds the trimmed text
    Utterance(String),
}

impl UserInput {
    /// Classify a raw input line
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return UserInput::Empty;
        }
        if QUIT_KEYWORDS
            .iter()
            .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
        {
            return UserInput::Quit;
        }
        UserInput::Utterance(trimmed.to_string())
    }

    /// Returns the utterance text if this input is a turn for the agent
    pub fn utterance(&self) -> Option<&str> {
        match self {
            UserInput::Utterance(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, UserInput::Quit)
    }
}
