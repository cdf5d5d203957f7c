//! Log Redaction Layer
//!
//! Scrubs upstream API keys, bearer tokens and bot tokens from strings prior
//! to logging. Users paste their keys into chat, so every inbound message
//! goes through here before it reaches a log line.

use regex::Regex;
use std::sync::LazyLock;

/// `/openai <key>` and `/elevenlabs <key>`, optionally addressed as `/cmd@botname`.
static KEY_COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(\s*/(?:openai|elevenlabs)(?:@\w+)?)\s+\S.*$").unwrap()
});
static OPENAI_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").unwrap());
static ELEVENLABS_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:sk_[a-f0-9]{32,}|[a-f0-9]{32})\b").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());
static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{6,12}:[A-Za-z0-9_\-]{30,}").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = KEY_COMMAND_RE.replace(input, "$1 [REDACTED_KEY]").to_string();

    redacted = BOT_TOKEN_RE.replace_all(&redacted, "[REDACTED_BOT_TOKEN]").to_string();
    redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted = OPENAI_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]").to_string();
    redacted = ELEVENLABS_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]").to_string();

    redacted
}
