//! Port traits defining external boundaries.
//!
//! The reactor talks to the outside world only through these traits:
//! obtaining a credential, and querying or creating tickets. Implementations
//! live in `src/adapters/`.

pub mod credentials;
pub mod tickets;

/// Error type returned across every port boundary.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

pub use credentials::{
    Credential, CredentialFuture, CredentialProvider, RedactedCredential, Secret,
    StaticCredentials,
};
pub use tickets::{CreateFuture, DedupQuery, ExistsFuture, TicketSink};
