//! Replaying adapter for the `CredentialProvider` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Credential, CredentialFuture, CredentialProvider, RedactedCredential, Secret};

/// Serves recorded credential fetches. Secrets are placeholders since
/// cassettes never contain real ones.
pub struct ReplayingCredentialProvider {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingCredentialProvider {
    /// Create a replaying provider backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl CredentialProvider for ReplayingCredentialProvider {
    fn fetch_credential(&self) -> CredentialFuture<'_> {
        let result = next_output(&self.replayer, "credentials", "fetch_credential")
            .and_then(replay_result::<RedactedCredential>);
        Box::pin(async move {
            let redacted = result?;
            let secret = if redacted.scheme == "basic" {
                Secret::Basic { username: "replayed".into(), password: String::new() }
            } else {
                Secret::Bearer("replayed".into())
            };
            Ok(Credential { secret, identity: redacted.identity })
        })
    }
}
