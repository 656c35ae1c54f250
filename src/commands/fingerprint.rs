//! `seq-ticket fingerprint` command.

use crate::fingerprint::fingerprint;

/// Prints the fingerprint of `text`.
///
/// # Errors
///
/// Never fails; returns `Result` for dispatch uniformity.
pub fn run(text: &str) -> Result<(), String> {
    println!("{}", fingerprint(text));
    Ok(())
}
