//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::jira::JiraTracker;
use crate::adapters::live::ontime::{base_url, OnTimeAccount, OnTimeAuthenticator, OnTimeTracker};
use crate::adapters::live::http_client;
use crate::adapters::recording::{RecordingCredentialProvider, RecordingTicketSink};
use crate::adapters::replaying::{ReplayingCredentialProvider, ReplayingTicketSink};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::{require, Config, TrackerKind};
use crate::error::ConfigError;
use crate::ports::{CredentialProvider, StaticCredentials, TicketSink};

/// Bundles the tracker-facing ports.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Source of a fresh credential for every run.
    pub credentials: Box<dyn CredentialProvider>,
    /// The tracker tickets are looked up in and filed to.
    pub tickets: Box<dyn TicketSink>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn new(credentials: Box<dyn CredentialProvider>, tickets: Box<dyn TicketSink>) -> Self {
        Self { credentials, tickets, recorder: None }
    }

    /// Creates a live context for the tracker selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting the tracker needs is missing, or the
    /// HTTP client cannot be built.
    pub fn live(config: &Config) -> Result<Self, ConfigError> {
        let client = http_client(config.request_timeout.0).map_err(|e| ConfigError::Invalid {
            name: "SEQ_TICKET_TIMEOUT_MS",
            reason: e.to_string(),
        })?;

        match config.tracker {
            TrackerKind::Jira => {
                let jira = &config.jira;
                let host = require(jira.host.as_ref(), "JIRA_HOST")?;
                let credentials = StaticCredentials::basic(
                    require(jira.username.as_ref(), "JIRA_USERNAME")?,
                    require(jira.password.as_ref(), "JIRA_PASSWORD")?,
                );
                let tracker = JiraTracker::new(client, &host, jira.send_priority);
                Ok(Self::new(Box::new(credentials), Box::new(tracker)))
            }
            TrackerKind::OnTime => {
                let ontime = &config.ontime;
                let base = base_url(&require(ontime.host.as_ref(), "ONTIME_HOST")?, &ontime.path);
                let account = OnTimeAccount {
                    username: require(ontime.username.as_ref(), "ONTIME_USERNAME")?,
                    password: require(ontime.password.as_ref(), "ONTIME_PASSWORD")?,
                    client_id: require(ontime.client_id.as_ref(), "ONTIME_CLIENT_ID")?,
                    client_secret: require(ontime.client_secret.as_ref(), "ONTIME_CLIENT_SECRET")?,
                };
                let credentials = OnTimeAuthenticator::new(client.clone(), &base, account);
                let tracker = OnTimeTracker::new(client, &base, ontime.item_kind);
                Ok(Self::new(Box::new(credentials), Box::new(tracker)))
            }
        }
    }

    /// Creates a live context whose interactions are recorded to a cassette
    /// at `path`, written by [`ServiceContext::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`ServiceContext::live`].
    pub fn recording(config: &Config, path: &Path) -> Result<Self, ConfigError> {
        let live = Self::live(config)?;
        let tracker = config.tracker.to_string();
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{tracker}-session"),
            tracker,
        )));

        Ok(Self {
            credentials: Box::new(RecordingCredentialProvider::new(
                live.credentials,
                Arc::clone(&recorder),
            )),
            tickets: Box::new(RecordingTicketSink::new(live.tickets, Arc::clone(&recorder))),
            recorder: Some(recorder),
        })
    }

    /// Creates a context served entirely from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Ok(Self::new(
            Box::new(ReplayingCredentialProvider::new(Arc::clone(&replayer))),
            Box::new(ReplayingTicketSink::new(replayer)),
        ))
    }

    /// Releases the ports and writes the cassette if this context was
    /// recording. Returns the cassette path when one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Self { credentials, tickets, recorder } = self;
        drop(credentials);
        drop(tickets);

        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "Recording adapters still hold the recorder".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map(Some).map_err(|e| format!("Failed to write cassette: {e}"))
    }
}
