//! Existence check for previously filed tickets.
//!
//! Exact equality on the dedup field is the intended semantic. Trackers
//! whose query language only offers substring matching must filter the
//! results down to exact matches inside their adapter.

use crate::error::ReactorError;
use crate::ports::{Credential, DedupQuery, TicketSink};

/// Asks the tracker whether a ticket for `fingerprint` already exists in
/// `project`.
///
/// Issues exactly one read-only query and never retries.
///
/// # Errors
///
/// Returns [`ReactorError::LookupFailed`] if the query fails for any reason.
pub async fn ticket_exists(
    sink: &dyn TicketSink,
    credential: &Credential,
    project: &str,
    dedup_field: &str,
    fingerprint: &str,
) -> Result<bool, ReactorError> {
    let query = DedupQuery {
        project: project.to_string(),
        field: dedup_field.to_string(),
        fingerprint: fingerprint.to_string(),
    };
    sink.exists(credential, &query).await.map_err(|e| ReactorError::LookupFailed(e.to_string()))
}
