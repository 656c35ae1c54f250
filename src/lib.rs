//! Deduplicated ticket filing for log and exception events.
//!
//! Each event is fingerprinted; the tracker is asked whether a ticket with
//! that fingerprint already exists, and a new ticket is filed only when it
//! does not.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod existence;
pub mod fingerprint;
pub mod ports;
pub mod reactor;
pub mod template;
pub mod ticket;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
