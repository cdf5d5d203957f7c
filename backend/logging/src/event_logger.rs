//! Bot Event Logger
//!
//! Structured events (command received, reply sent, upstream failure) emitted
//! through `tracing` so they land in the NDJSON file log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum BotEvent {
    CommandReceived { command: String, text: String },
    ReplySent { kind: String },
    UpstreamFailure { service: String, error_msg: String },
}

impl BotEvent {
    fn redact(&mut self) {
        match self {
            BotEvent::CommandReceived { text, .. } => *text = redact_sensitive_data(text),
            BotEvent::UpstreamFailure { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg)
            }
            BotEvent::ReplySent { .. } => {}
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub conversation: String,
    pub timestamp: DateTime<Utc>,
    pub event: BotEvent,
}

impl EventLogEntry {
    pub fn new(conversation: &str, mut event: BotEvent) -> Self {
        event.redact();
        Self {
            conversation: conversation.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Redact and emit one bot event.
    pub fn log_event(conversation: &str, event: BotEvent) {
        let entry = EventLogEntry::new(conversation, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "bot_events", event = %json, "Bot event");
    }
}
