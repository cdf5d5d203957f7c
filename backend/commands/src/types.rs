/// Slash command types.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

/// A fully-defined slash command entry in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDef {
    /// Unique key the dispatcher routes on (e.g. "query", "set_voice").
    pub key: String,
    /// How the command is written in help output, e.g. `/query {your query}`.
    pub usage: String,
    pub description: String,
    /// Slash aliases (must start with '/').
    pub text_aliases: Vec<String>,
    pub accepts_args: bool,
}

impl CommandDef {
    /// Alias names without the leading slash, as Telegram's command menu wants them.
    pub fn native_names(&self) -> impl Iterator<Item = &str> {
        self.text_aliases
            .iter()
            .map(|a| a.trim_start_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// A detected and parsed slash-command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub key: String,
    /// The alias as typed, minus any `@botname` suffix addressed to us.
    pub raw_alias: String,
    /// Full remaining text after the command name, trimmed.
    pub raw_args: String,
}

/// What an inbound text turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Command(CommandInvocation),
    /// Starts with '/' but matches no registered alias.
    Unknown(String),
    NotACommand,
}
