//! Log events delivered by the monitoring stream.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Tracing-level noise.
    Verbose,
    /// Diagnostic detail.
    Debug,
    /// Normal operation.
    Information,
    /// Something unexpected that did not fail.
    Warning,
    /// A failed operation.
    Error,
    /// The application cannot continue.
    Fatal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Verbose => "Verbose",
            Level::Debug => "Debug",
            Level::Information => "Information",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        };
        f.write_str(name)
    }
}

/// A single log event as seen by the reactor.
///
/// Events are owned by the host and never modified while a ticket is
/// being filed for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// Unique identifier assigned by the log server.
    pub id: String,
    /// When the event was raised.
    pub timestamp: DateTime<Utc>,
    /// Severity level.
    pub level: Level,
    /// The message template rendered against the event's properties.
    pub rendered_message: String,
    /// Raw exception text, when the event carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    /// Named properties, kept sorted by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Event {
    /// The text that identifies the underlying problem: the exception when
    /// present, otherwise the rendered message.
    #[must_use]
    pub fn distinguishing_text(&self) -> &str {
        self.exception.as_deref().unwrap_or(&self.rendered_message)
    }
}
