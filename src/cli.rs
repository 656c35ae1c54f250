//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `seq-ticket`.
#[derive(Debug, Parser)]
#[command(name = "seq-ticket", version, about = "File deduplicated tickets for log events")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// File tickets for JSON-lines events read from a file or stdin.
    React {
        /// Events file; stdin when omitted.
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Serve tracker interactions from this cassette instead of the network.
        #[arg(long)]
        replay: Option<PathBuf>,
        /// Check for existing tickets but do not create any.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the fingerprint of a piece of text.
    Fingerprint {
        /// Exception or message text.
        text: String,
    },
    /// Render the ticket body for a single JSON event.
    Render {
        /// File holding one JSON event.
        #[arg(long, short)]
        event: PathBuf,
        /// Body template; the default body when omitted.
        #[arg(long, short)]
        template: Option<String>,
    },
}
