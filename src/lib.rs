//! Core library for the `devhost` CLI.
//!
//! [`host::Host`] is the composition root: it owns the environment ports
//! and service clients every command works through.

pub mod adapters;
pub mod cassette;
pub mod checkout;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod layout_tests;
pub mod logging;
pub mod net;
pub mod ports;
pub mod watchlist;
pub mod workspace;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// `--help` and `--version` print to stdout and return `Ok`.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().map_err(|e| format!("Failed to print usage: {e}"))?;
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
