//! Environment configuration.
//!
//! Values come from the process environment (after an optional `.env` file
//! is loaded by the binary). Vendor-specific settings are optional at parse
//! time and checked when the selected tracker is wired up.

use std::fmt;
use std::str::FromStr;
use std::time;

use envconfig::Envconfig;

use crate::adapters::live::jira::custom_field_name;
use crate::adapters::live::ontime::ItemKind;
use crate::error::ConfigError;
use crate::reactor::ReactorSettings;

/// Top-level settings.
#[derive(Envconfig, Clone)]
pub struct Config {
    /// Which tracker to file into.
    #[envconfig(from = "SEQ_TICKET_TRACKER", default = "jira")]
    pub tracker: TrackerKind,

    /// Base URL of the log viewer, used for back-links in ticket bodies.
    #[envconfig(from = "SEQ_VIEWER_URL")]
    pub viewer_url: String,

    /// Custom body template; the default body is used when unset.
    #[envconfig(from = "SEQ_TICKET_BODY_TEMPLATE")]
    pub body_template: Option<String>,

    /// Timeout applied to every tracker request.
    #[envconfig(from = "SEQ_TICKET_TIMEOUT_MS", default = "10000")]
    pub request_timeout: EnvMsDuration,

    /// Jira settings.
    #[envconfig(nested = true)]
    pub jira: JiraConfig,

    /// OnTime settings.
    #[envconfig(nested = true)]
    pub ontime: OnTimeConfig,
}

/// Jira connection and filing settings.
#[derive(Envconfig, Clone)]
pub struct JiraConfig {
    /// Jira base URL, without `/rest/api`.
    #[envconfig(from = "JIRA_HOST")]
    pub host: Option<String>,

    /// Project key issues are filed under.
    #[envconfig(from = "JIRA_PROJECT_KEY")]
    pub project_key: Option<String>,

    /// Numeric id of the custom field storing fingerprints.
    #[envconfig(from = "JIRA_DEDUP_FIELD")]
    pub dedup_field: Option<u32>,

    /// Issue type name.
    #[envconfig(from = "JIRA_ISSUE_TYPE", default = "Bug")]
    pub issue_type: String,

    /// Basic-auth user.
    #[envconfig(from = "JIRA_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password or API token.
    #[envconfig(from = "JIRA_PASSWORD")]
    pub password: Option<String>,

    /// Whether to send a `priority` field on created issues.
    #[envconfig(from = "JIRA_SEND_PRIORITY", default = "false")]
    pub send_priority: bool,
}

/// OnTime connection and filing settings.
#[derive(Envconfig, Clone)]
pub struct OnTimeConfig {
    /// OnTime base URL.
    #[envconfig(from = "ONTIME_HOST")]
    pub host: Option<String>,

    /// Extra path under the host, if the API is not at the root.
    #[envconfig(from = "ONTIME_PATH", default = "")]
    pub path: String,

    /// Numeric project id.
    #[envconfig(from = "ONTIME_PROJECT_ID")]
    pub project_id: Option<u64>,

    /// `defects` or `incidents`.
    #[envconfig(from = "ONTIME_ITEM_KIND", default = "defects")]
    pub item_kind: ItemKind,

    /// Item field storing fingerprints.
    #[envconfig(from = "ONTIME_DEDUP_FIELD", default = "notes")]
    pub dedup_field: String,

    /// OAuth2 user.
    #[envconfig(from = "ONTIME_USERNAME")]
    pub username: Option<String>,

    /// OAuth2 password.
    #[envconfig(from = "ONTIME_PASSWORD")]
    pub password: Option<String>,

    /// OAuth2 client id.
    #[envconfig(from = "ONTIME_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth2 client secret.
    #[envconfig(from = "ONTIME_CLIENT_SECRET")]
    pub client_secret: Option<String>,
}

/// Supported trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    /// Atlassian Jira.
    Jira,
    /// Axosoft OnTime.
    OnTime,
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrackerKind::Jira => "jira",
            TrackerKind::OnTime => "ontime",
        })
    }
}

impl FromStr for TrackerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jira" => Ok(TrackerKind::Jira),
            "ontime" => Ok(TrackerKind::OnTime),
            other => Err(format!("unknown tracker {other:?}")),
        }
    }
}

/// A duration given in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct EnvMsDuration(pub time::Duration);

/// Returned when a millisecond value is not an integer.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseEnvMsDurationError;

impl FromStr for EnvMsDuration {
    type Err = ParseEnvMsDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.parse::<u64>().map_err(|_| ParseEnvMsDurationError)?;
        Ok(EnvMsDuration(time::Duration::from_millis(ms)))
    }
}

/// Unwraps an optional setting, naming the variable when it is missing.
pub(crate) fn require<T: Clone>(value: Option<&T>, name: &'static str) -> Result<T, ConfigError> {
    value.cloned().ok_or(ConfigError::Missing(name))
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::init_from_env()?)
    }

    /// Filing settings for the selected tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker's project or dedup field is not configured.
    pub fn reactor_settings(&self) -> Result<ReactorSettings, ConfigError> {
        if self.viewer_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "SEQ_VIEWER_URL",
                reason: "must not be empty".into(),
            });
        }

        let (project, dedup_field, kind) = match self.tracker {
            TrackerKind::Jira => (
                require(self.jira.project_key.as_ref(), "JIRA_PROJECT_KEY")?,
                custom_field_name(require(self.jira.dedup_field.as_ref(), "JIRA_DEDUP_FIELD")?),
                self.jira.issue_type.clone(),
            ),
            TrackerKind::OnTime => (
                require(self.ontime.project_id.as_ref(), "ONTIME_PROJECT_ID")?.to_string(),
                self.ontime.dedup_field.clone(),
                self.ontime.item_kind.to_string(),
            ),
        };

        Ok(ReactorSettings {
            project,
            dedup_field,
            kind,
            viewer_url: self.viewer_url.clone(),
            body_template: self.body_template.clone(),
        })
    }
}
