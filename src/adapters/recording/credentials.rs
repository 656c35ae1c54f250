//! Recording adapter for the `CredentialProvider` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CredentialFuture, CredentialProvider};

/// Records credential fetches while delegating to an inner provider.
///
/// Only the scheme and identity are written; secrets never reach the cassette.
pub struct RecordingCredentialProvider {
    inner: Box<dyn CredentialProvider>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCredentialProvider {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn CredentialProvider>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl CredentialProvider for RecordingCredentialProvider {
    fn fetch_credential(&self) -> CredentialFuture<'_> {
        Box::pin(async move {
            let result = self.inner.fetch_credential().await;
            let redacted = result.as_ref().map(crate::ports::Credential::redacted);
            record_result(&self.recorder, "credentials", "fetch_credential", &(), &redacted);
            result
        })
    }
}
