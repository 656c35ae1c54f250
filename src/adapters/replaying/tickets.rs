//! Replaying adapter for the `TicketSink` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CreateFuture, Credential, DedupQuery, ExistsFuture, TicketSink};
use crate::ticket::{Ticket, TicketReceipt};

/// Serves recorded tracker answers from a cassette.
pub struct ReplayingTicketSink {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingTicketSink {
    /// Create a replaying sink backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl TicketSink for ReplayingTicketSink {
    fn exists<'a>(
        &'a self,
        _credential: &'a Credential,
        _query: &'a DedupQuery,
    ) -> ExistsFuture<'a> {
        let result =
            next_output(&self.replayer, "tickets", "exists").and_then(replay_result::<bool>);
        Box::pin(async move { result })
    }

    fn create<'a>(&'a self, _credential: &'a Credential, _ticket: &'a Ticket) -> CreateFuture<'a> {
        let result = next_output(&self.replayer, "tickets", "create")
            .and_then(replay_result::<TicketReceipt>);
        Box::pin(async move { result })
    }
}
