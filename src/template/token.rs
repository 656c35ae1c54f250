//! Template tokens and how each renders against an event.

use std::fmt::Write;

use chrono::Local;

use crate::event::Event;

/// One parsed piece of a body template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text copied to the output unchanged.
    Literal(String),
    /// A `{{name}}` reference resolved against the event.
    Placeholder(String),
}

impl Token {
    /// Appends this token's rendering of `event` to `output`.
    pub fn render(&self, output: &mut String, event: &Event) {
        match self {
            Token::Literal(text) => output.push_str(text),
            Token::Placeholder(name) => write_field(output, name, event),
        }
    }
}

/// Resolves `name` against the built-in fields first, then the event's
/// properties. Unknown names write nothing.
fn write_field(output: &mut String, name: &str, event: &Event) {
    match name {
        "@Timestamp" => {
            let local = event.timestamp.with_timezone(&Local);
            let _ = write!(output, "{}", local.format(TIMESTAMP_FORMAT));
        }
        "@Level" => {
            let _ = write!(output, "{}", event.level);
        }
        "@RenderedMessage" => output.push_str(&event.rendered_message),
        "@Exception" => output.push_str(event.exception.as_deref().unwrap_or_default()),
        "@Id" => output.push_str(&event.id),
        _ => {
            if let Some(value) = event.properties.get(name) {
                write_value(output, value);
            }
        }
    }
}

/// Format used for `@Timestamp`, in the viewer's local time zone.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

// Strings render bare; everything else renders as compact JSON.
fn write_value(output: &mut String, value: &serde_json::Value) {
    match value {
        serde_json::Value::String(s) => output.push_str(s),
        other => {
            let _ = write!(output, "{other}");
        }
    }
}
