//! Command dispatch and handlers.

pub mod fingerprint;
pub mod react;
pub mod render;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::React { input, replay, dry_run } => {
            react::run(input.as_deref(), replay.as_deref(), *dry_run)
        }
        Command::Fingerprint { text } => fingerprint::run(text),
        Command::Render { event, template } => render::run(event, template.as_deref()),
    }
}
