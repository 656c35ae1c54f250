//! Error taxonomy for a single reactor run.

use thiserror::Error;

/// Why filing a ticket for one event failed.
///
/// Every variant ends the run for the current event only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReactorError {
    /// No credential could be obtained from the tracker.
    #[error("authentication against the tracker failed: {0}")]
    AuthFailed(String),
    /// The existence query could not complete; nothing was filed.
    #[error("could not check the tracker for an existing ticket: {0}")]
    LookupFailed(String),
    /// The tracker rejected or never answered the create request.
    #[error("ticket creation failed: {0}")]
    SubmitFailed(String),
}

/// Invalid or missing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading variables from the environment failed.
    #[error("invalid configuration: {0}")]
    Env(#[from] envconfig::Error),
    /// A setting the selected tracker needs was not provided.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// A setting was present but could not be used.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}
