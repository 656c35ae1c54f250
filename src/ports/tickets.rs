//! Ticket sink port: the tracker-side half of deduplicated filing.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::credentials::Credential;
use super::PortError;
use crate::ticket::{Ticket, TicketReceipt};

/// Boxed future returned by [`TicketSink::exists`].
pub type ExistsFuture<'a> = Pin<Box<dyn Future<Output = Result<bool, PortError>> + Send + 'a>>;

/// Boxed future returned by [`TicketSink::create`].
pub type CreateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TicketReceipt, PortError>> + Send + 'a>>;

/// A lookup for tickets whose dedup field equals a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupQuery {
    /// Project to search in.
    pub project: String,
    /// Name of the tracker field that stores fingerprints.
    pub field: String,
    /// Fingerprint to match exactly.
    pub fingerprint: String,
}

/// Queries and creates tickets in an external tracker.
///
/// One implementation exists per vendor; they differ only in request and
/// payload shape.
pub trait TicketSink: Send + Sync {
    /// Returns whether a ticket matching `query` already exists. Read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be sent or its response cannot be read.
    fn exists<'a>(&'a self, credential: &'a Credential, query: &'a DedupQuery)
        -> ExistsFuture<'a>;

    /// Submits a new ticket.
    ///
    /// # Errors
    ///
    /// Returns an error, carrying the tracker's reason text when available,
    /// if the ticket is not created.
    fn create<'a>(&'a self, credential: &'a Credential, ticket: &'a Ticket) -> CreateFuture<'a>;
}
