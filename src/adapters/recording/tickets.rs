//! Recording adapter for the `TicketSink` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CreateFuture, Credential, DedupQuery, ExistsFuture, TicketSink};
use crate::ticket::Ticket;

/// Records tracker queries and creations while delegating to an inner sink.
pub struct RecordingTicketSink {
    inner: Box<dyn TicketSink>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTicketSink {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn TicketSink>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl TicketSink for RecordingTicketSink {
    fn exists<'a>(
        &'a self,
        credential: &'a Credential,
        query: &'a DedupQuery,
    ) -> ExistsFuture<'a> {
        Box::pin(async move {
            let result = self.inner.exists(credential, query).await;
            record_result(&self.recorder, "tickets", "exists", query, &result);
            result
        })
    }

    fn create<'a>(&'a self, credential: &'a Credential, ticket: &'a Ticket) -> CreateFuture<'a> {
        Box::pin(async move {
            let result = self.inner.create(credential, ticket).await;
            record_result(&self.recorder, "tickets", "create", ticket, &result);
            result
        })
    }
}
