//! Credential port for authenticating against a tracker.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;

/// Boxed future type alias used by [`CredentialProvider`] to keep the trait dyn-compatible.
pub type CredentialFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Credential, PortError>> + Send + 'a>>;

/// How requests are authorized.
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    /// HTTP basic authentication.
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
    /// An OAuth2 access token.
    Bearer(String),
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Basic { username, .. } => {
                f.debug_struct("Basic").field("username", username).finish_non_exhaustive()
            }
            Secret::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// A credential scoped to one reactor run. Never written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The secret used to authorize requests.
    pub secret: Secret,
    /// Tracker-side identity of the authenticated user, when known.
    pub identity: Option<String>,
}

impl Credential {
    /// Summary safe to log or record: the scheme and identity, no secret.
    #[must_use]
    pub fn redacted(&self) -> RedactedCredential {
        let scheme = match self.secret {
            Secret::Basic { .. } => "basic",
            Secret::Bearer(_) => "bearer",
        };
        RedactedCredential { scheme: scheme.to_string(), identity: self.identity.clone() }
    }
}

/// The non-secret parts of a [`Credential`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedCredential {
    /// `basic` or `bearer`.
    pub scheme: String,
    /// Tracker-side identity.
    pub identity: Option<String>,
}

/// Obtains a fresh credential for the tracker.
///
/// Called once at the start of every reactor run; implementations do not
/// need to cache.
pub trait CredentialProvider: Send + Sync {
    /// Authenticates and returns a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or the response cannot be read.
    fn fetch_credential(&self) -> CredentialFuture<'_>;
}

/// Credentials that never change, such as a basic-auth pair.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credential: Credential,
}

impl StaticCredentials {
    /// Wraps a fixed credential.
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Basic-auth credentials with no resolved identity.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(Credential {
            secret: Secret::Basic { username: username.into(), password: password.into() },
            identity: None,
        })
    }
}

impl CredentialProvider for StaticCredentials {
    fn fetch_credential(&self) -> CredentialFuture<'_> {
        let credential = self.credential.clone();
        Box::pin(async move { Ok(credential) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let basic = Secret::Basic { username: "ops".into(), password: "hunter2".into() };
        let bearer = Secret::Bearer("tok-123".into());
        assert!(!format!("{basic:?}").contains("hunter2"));
        assert!(!format!("{bearer:?}").contains("tok-123"));
    }

    #[test]
    fn redacted_keeps_identity_only() {
        let credential =
            Credential { secret: Secret::Bearer("tok".into()), identity: Some("42".into()) };
        let redacted = credential.redacted();
        assert_eq!(redacted.scheme, "bearer");
        assert_eq!(redacted.identity.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn static_credentials_return_the_same_pair() {
        let provider = StaticCredentials::basic("ops", "pw");
        let credential = provider.fetch_credential().await.unwrap();
        assert_eq!(
            credential.secret,
            Secret::Basic { username: "ops".into(), password: "pw".into() }
        );
        assert!(credential.identity.is_none());
    }
}
