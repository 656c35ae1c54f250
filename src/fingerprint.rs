//! Stable identifiers for recurring problems.

use sha2::{Digest, Sha256};

use crate::event::Event;

/// Hashes `content` into an uppercase hexadecimal SHA-256 digest.
///
/// The result depends on nothing but the input bytes, so the same text
/// always maps to the same fingerprint.
#[must_use]
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:X}", hasher.finalize())
}

/// Fingerprints an event by its exception text, falling back to the
/// rendered message.
#[must_use]
pub fn fingerprint_event(event: &Event) -> String {
    fingerprint(event.distinguishing_text())
}
