//! Tracker-agnostic tickets and the mapping from events to tickets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{Event, Level};

/// Longest title the tracker UIs display without clipping.
pub const MAX_TITLE_CHARS: usize = 120;

/// Two-tier ticket priority derived from event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Anything below `Error`.
    Low,
    /// `Error` and `Fatal`.
    High,
}

impl Priority {
    /// Maps an event level to a ticket priority.
    #[must_use]
    pub fn from_level(level: Level) -> Self {
        if level >= Level::Error {
            Priority::High
        } else {
            Priority::Low
        }
    }

    /// Lowercase name used in logs and generic payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket ready to be submitted to a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Operator-configured project reference (key or numeric id).
    pub project: String,
    /// Short single-line summary.
    pub title: String,
    /// Rendered body including the back-link to the event.
    pub body: String,
    /// Issue type or item kind the tracker files this under.
    pub kind: String,
    /// Priority derived from the event level.
    pub priority: Priority,
    /// Name of the tracker field that stores the fingerprint.
    pub dedup_field: String,
    /// Fingerprint stored in the tracker's dedup field.
    pub fingerprint: String,
    /// Assignee resolved from the authenticated identity, if any.
    pub assignee: Option<String>,
}

/// Identifier the tracker assigned to a created ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    /// Tracker-side id or key (e.g. `OPS-42`).
    pub id: String,
}

/// Everything the builder needs besides the event itself.
#[derive(Debug, Clone, Copy)]
pub struct TicketParams<'a> {
    /// Event fingerprint.
    pub fingerprint: &'a str,
    /// Tracker field that stores the fingerprint.
    pub dedup_field: &'a str,
    /// Body rendered from the template.
    pub rendered_body: &'a str,
    /// Project reference.
    pub project: &'a str,
    /// Issue type or item kind.
    pub kind: &'a str,
    /// Optional assignee.
    pub assignee: Option<&'a str>,
    /// Base URL of the log viewer used for the back-link.
    pub viewer_url: &'a str,
}

/// Maps an event and its computed fields into a ticket. Performs no I/O.
#[must_use]
pub fn build(event: &Event, params: &TicketParams<'_>) -> Ticket {
    let link = event_link(params.viewer_url, &event.id);
    let body = if params.rendered_body.is_empty() {
        link
    } else {
        format!("{}\n\n{link}", params.rendered_body)
    };

    Ticket {
        project: params.project.to_string(),
        title: derive_title(&event.rendered_message),
        body,
        kind: params.kind.to_string(),
        priority: Priority::from_level(event.level),
        dedup_field: params.dedup_field.to_string(),
        fingerprint: params.fingerprint.to_string(),
        assignee: params.assignee.map(str::to_string),
    }
}

/// Cuts a message down to a ticket title: first at the first line break,
/// then to [`MAX_TITLE_CHARS`] characters.
///
/// Leading line breaks are skipped, so the title never contains one.
#[must_use]
pub fn derive_title(message: &str) -> String {
    let message = message.trim_start_matches(['\n', '\r']);
    let first_line = message.find(['\n', '\r']).map_or(message, |index| &message[..index]);
    first_line.chars().take(MAX_TITLE_CHARS).collect()
}

/// Link that opens the originating event in the log viewer.
#[must_use]
pub fn event_link(viewer_url: &str, event_id: &str) -> String {
    format!(
        "{}/#/events?filter=@Id==\"{}\"",
        viewer_url.trim_end_matches('/'),
        urlencoding::encode(event_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn event(level: Level, message: &str) -> Event {
        Event {
            id: "E1".into(),
            timestamp: Utc::now(),
            level,
            rendered_message: message.into(),
            exception: None,
            properties: BTreeMap::new(),
        }
    }

    fn params<'a>() -> TicketParams<'a> {
        TicketParams {
            fingerprint: "ABC",
            dedup_field: "customfield_10425",
            rendered_body: "body text",
            project: "OPS",
            kind: "Bug",
            assignee: None,
            viewer_url: "https://seq.example.com/",
        }
    }

    #[test]
    fn long_message_is_cut_to_max_length() {
        let message = "x".repeat(200);
        assert_eq!(derive_title(&message).chars().count(), 120);
    }

    #[test]
    fn line_break_truncates_before_length() {
        let message = format!("0123456789\n{}", "y".repeat(300));
        assert_eq!(derive_title(&message), "0123456789");
        assert_eq!(derive_title("0123456789\r\nrest"), "0123456789");
    }

    #[test]
    fn leading_line_break_is_ignored() {
        assert_eq!(derive_title("\nabc"), "abc");
        assert_eq!(derive_title("\r\n\nabc\ndef"), "abc");
    }

    #[test]
    fn stack_trace_after_leading_break_is_cut() {
        let title = derive_title("\nNullReferenceException in Checkout\n   at Foo.Bar()");
        assert_eq!(title, "NullReferenceException in Checkout");
        assert!(!title.contains(['\n', '\r']));
    }

    #[test]
    fn multibyte_titles_count_characters() {
        let message = "é".repeat(150);
        assert_eq!(derive_title(&message).chars().count(), 120);
    }

    #[test]
    fn priority_mapping() {
        assert_eq!(Priority::from_level(Level::Verbose), Priority::Low);
        assert_eq!(Priority::from_level(Level::Debug), Priority::Low);
        assert_eq!(Priority::from_level(Level::Information), Priority::Low);
        assert_eq!(Priority::from_level(Level::Warning), Priority::Low);
        assert_eq!(Priority::from_level(Level::Error), Priority::High);
        assert_eq!(Priority::from_level(Level::Fatal), Priority::High);
        assert_eq!(Priority::High.to_string(), "high");
    }

    #[test]
    fn event_link_uses_viewer_filter() {
        assert_eq!(
            event_link("https://seq.example.com/", "E1"),
            "https://seq.example.com/#/events?filter=@Id==\"E1\""
        );
        assert_eq!(
            event_link("http://seq", "a b"),
            "http://seq/#/events?filter=@Id==\"a%20b\""
        );
    }

    #[test]
    fn build_embeds_link_and_copies_fields() {
        let mut p = params();
        p.assignee = Some("17");
        let ticket = build(&event(Level::Error, "DB timeout\nstack"), &p);
        assert_eq!(ticket.title, "DB timeout");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.fingerprint, "ABC");
        assert_eq!(ticket.dedup_field, "customfield_10425");
        assert_eq!(ticket.project, "OPS");
        assert_eq!(ticket.kind, "Bug");
        assert_eq!(ticket.assignee.as_deref(), Some("17"));
        assert!(ticket.body.starts_with("body text\n\n"));
        assert!(ticket.body.ends_with("/#/events?filter=@Id==\"E1\""));
    }
}
