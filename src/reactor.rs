//! The reactor: turns one event into at most one ticket.
//!
//! Each run is independent: fingerprint the event, fetch a fresh
//! credential, ask the tracker whether the fingerprint is already filed,
//! and only if it is not, render, build and submit a ticket. Every failure
//! is contained in the returned [`Outcome`]; nothing propagates to the
//! caller's event loop.
//!
//! Two runs for the same fingerprint that overlap in time can both miss
//! each other's not-yet-visible ticket and file twice. Nothing here locks
//! across runs; redelivery rates keep that window small in practice.

use std::fmt;

use tracing::{debug, error, info};

use crate::context::ServiceContext;
use crate::error::ReactorError;
use crate::event::Event;
use crate::existence::ticket_exists;
use crate::fingerprint::fingerprint_event;
use crate::template::render_body;
use crate::ticket::{self, Ticket, TicketParams};

/// Per-tracker filing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorSettings {
    /// Project reference tickets are filed under.
    pub project: String,
    /// Tracker field holding the fingerprint.
    pub dedup_field: String,
    /// Issue type or item kind.
    pub kind: String,
    /// Log viewer base URL for back-links.
    pub viewer_url: String,
    /// Custom body template, if any.
    pub body_template: Option<String>,
}

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new ticket was created.
    Filed {
        /// Event fingerprint.
        fingerprint: String,
        /// Tracker id of the new ticket.
        ticket_id: String,
    },
    /// A ticket with this fingerprint already exists; nothing was created.
    Skipped {
        /// Event fingerprint.
        fingerprint: String,
    },
    /// Dry run: a ticket would have been created.
    WouldFile {
        /// The ticket that would have been submitted.
        ticket: Box<Ticket>,
    },
    /// The run stopped on an error. No retry is attempted.
    Failed {
        /// Event fingerprint.
        fingerprint: String,
        /// What went wrong.
        error: ReactorError,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Filed { ticket_id, .. } => write!(f, "FILED {ticket_id}"),
            Outcome::Skipped { fingerprint } => write!(f, "SKIPPED {fingerprint}"),
            Outcome::WouldFile { ticket } => write!(f, "WOULD FILE {}", ticket.title),
            Outcome::Failed { error, .. } => write!(f, "FAILED {error}"),
        }
    }
}

/// Files deduplicated tickets for events.
pub struct Reactor<'a> {
    ctx: &'a ServiceContext,
    settings: ReactorSettings,
    dry_run: bool,
}

impl<'a> Reactor<'a> {
    /// Creates a reactor filing through `ctx`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, settings: ReactorSettings) -> Self {
        Self { ctx, settings, dry_run: false }
    }

    /// Stops short of submitting: runs report [`Outcome::WouldFile`] instead.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes one event to completion.
    pub async fn on_event(&self, event: &Event) -> Outcome {
        let fingerprint = fingerprint_event(event);

        match self.file(event, &fingerprint).await {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Filed { ticket_id, .. } => {
                        info!(event_id = %event.id, %fingerprint, %ticket_id, "ticket filed");
                    }
                    Outcome::Skipped { .. } => {
                        debug!(event_id = %event.id, %fingerprint, "ticket already exists");
                    }
                    Outcome::WouldFile { .. } => {
                        info!(event_id = %event.id, %fingerprint, "dry run, ticket not submitted");
                    }
                    Outcome::Failed { .. } => {}
                }
                outcome
            }
            Err(error) => {
                error!(event_id = %event.id, %fingerprint, %error, "failed to file ticket");
                Outcome::Failed { fingerprint, error }
            }
        }
    }

    async fn file(&self, event: &Event, fingerprint: &str) -> Result<Outcome, ReactorError> {
        let credential = self
            .ctx
            .credentials
            .fetch_credential()
            .await
            .map_err(|e| ReactorError::AuthFailed(e.to_string()))?;

        let settings = &self.settings;
        if ticket_exists(
            self.ctx.tickets.as_ref(),
            &credential,
            &settings.project,
            &settings.dedup_field,
            fingerprint,
        )
        .await?
        {
            return Ok(Outcome::Skipped { fingerprint: fingerprint.to_string() });
        }

        let rendered_body = render_body(settings.body_template.as_deref(), event);
        let ticket = ticket::build(
            event,
            &TicketParams {
                fingerprint,
                dedup_field: &settings.dedup_field,
                rendered_body: &rendered_body,
                project: &settings.project,
                kind: &settings.kind,
                assignee: credential.identity.as_deref(),
                viewer_url: &settings.viewer_url,
            },
        );

        if self.dry_run {
            return Ok(Outcome::WouldFile { ticket: Box::new(ticket) });
        }

        let receipt = self
            .ctx
            .tickets
            .create(&credential, &ticket)
            .await
            .map_err(|e| ReactorError::SubmitFailed(e.to_string()))?;

        Ok(Outcome::Filed { fingerprint: fingerprint.to_string(), ticket_id: receipt.id })
    }
}
