//! Mustache-like body templates.
//!
//! A template is literal text with `{{name}}` placeholders. Names starting
//! with `@` refer to built-in event fields (`@Timestamp`, `@Level`,
//! `@RenderedMessage`, `@Exception`, `@Id`); any other name is looked up in
//! the event's properties. Rendering is total: malformed templates and
//! unknown names never produce an error.

pub mod parser;
pub mod token;

use std::fmt::Write;

pub use parser::parse;
pub use token::Token;

use crate::event::Event;

/// Renders already-parsed tokens against an event.
#[must_use]
pub fn render_tokens(tokens: &[Token], event: &Event) -> String {
    let mut output = String::new();
    for token in tokens {
        token.render(&mut output, event);
    }
    output
}

/// Parses and renders `template` against an event.
#[must_use]
pub fn render(template: &str, event: &Event) -> String {
    render_tokens(&parse(template), event)
}

/// Builds the default body template for an event: a header line, one line
/// per property in key order, then the exception.
#[must_use]
pub fn default_body_template(event: &Event) -> String {
    let mut body = String::from("{{@Timestamp}} [{{@Level}}] {{@RenderedMessage}}");

    if !event.properties.is_empty() {
        body.push('\n');
        for key in event.properties.keys() {
            let _ = writeln!(body, " {key} = {{{{{key}}}}}");
        }
    }

    if event.exception.is_some() {
        body.push('\n');
        body.push_str("{{@Exception}}");
    }

    body
}

/// Renders the body for an event, using `template` when given and the
/// default body otherwise.
#[must_use]
pub fn render_body(template: Option<&str>, event: &Event) -> String {
    match template {
        Some(t) => render(t, event),
        None => render(&default_body_template(event), event),
    }
}
