//! `seq-ticket react` command.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::event::Event;
use crate::reactor::{Outcome, Reactor, ReactorSettings};

/// Environment variable naming a cassette file to record live interactions to.
pub const RECORD_ENV: &str = "SEQ_TICKET_RECORD";

/// Per-outcome counts for one invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Tickets created.
    pub filed: usize,
    /// Events whose fingerprint was already filed.
    pub skipped: usize,
    /// Dry-run events that would have been filed.
    pub would_file: usize,
    /// Events whose run failed, including unparsable lines.
    pub failed: usize,
}

/// Execute the `react` command.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the input cannot
/// be opened. Individual event failures are reported, not returned.
pub fn run(input: Option<&Path>, replay: Option<&Path>, dry_run: bool) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    let settings = config.reactor_settings().map_err(|e| e.to_string())?;

    let ctx = match (replay, record_path(env::var(RECORD_ENV).ok())) {
        (Some(cassette), _) => ServiceContext::replaying(cassette)?,
        (None, Some(path)) => ServiceContext::recording(&config, &path).map_err(|e| e.to_string())?,
        (None, None) => ServiceContext::live(&config).map_err(|e| e.to_string())?,
    };

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .map_err(|e| format!("Failed to open events file {}: {e}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    let summary = runtime.block_on(process(
        &ctx,
        settings,
        dry_run,
        reader,
        &mut io::stdout().lock(),
    ));

    if let Some(path) = ctx.finish()? {
        eprintln!("Recording saved to: {}", path.display());
    }
    eprintln!(
        "{} filed, {} skipped, {} would file, {} failed",
        summary.filed, summary.skipped, summary.would_file, summary.failed
    );
    Ok(())
}

/// Cassette path to record to; an empty value counts as unset.
fn record_path(value: Option<String>) -> Option<PathBuf> {
    value.filter(|path| !path.trim().is_empty()).map(PathBuf::from)
}

/// Runs the reactor for every JSON line in `reader`, one event at a time,
/// writing one result line per event to `out`.
pub async fn process(
    ctx: &ServiceContext,
    settings: ReactorSettings,
    dry_run: bool,
    reader: impl BufRead,
    out: &mut impl Write,
) -> Summary {
    let reactor = Reactor::new(ctx, settings).dry_run(dry_run);
    let mut summary = Summary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(line = line_no, error = %e, "failed to read input line");
                summary.failed += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let event: Event = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed event");
                let _ = writeln!(out, "INVALID line {line_no}: {e}");
                summary.failed += 1;
                continue;
            }
        };

        let outcome = reactor.on_event(&event).await;
        match outcome {
            Outcome::Filed { .. } => summary.filed += 1,
            Outcome::Skipped { .. } => summary.skipped += 1,
            Outcome::WouldFile { .. } => summary.would_file += 1,
            Outcome::Failed { .. } => summary.failed += 1,
        }
        let _ = writeln!(out, "{} {outcome}", event.id);
    }

    summary
}
