//! Command dispatch and handlers.

pub mod bots;
pub mod bug;
pub mod info;
pub mod irc;
pub mod patch_status;
pub mod scm;
pub mod watchlist;

use crate::cassette::session::RecordingSession;
use crate::checkout::default_scm;
use crate::cli::Command;
use crate::config::HostConfig;
use crate::host::{Host, HostServices};

/// Dispatch a parsed command to its handler.
///
/// When `DEVHOST_RECORD` is set to a directory path, executive and web
/// interactions are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = HostConfig::from_env().map_err(|e| e.to_string())?;

    let session = match &config.record_dir {
        Some(dir) => {
            let scm = default_scm(&HostServices::live(), None).ok();
            Some(RecordingSession::new(dir, scm.as_deref())?)
        }
        None => None,
    };
    let mut host = match &session {
        Some(session) => Host::recording(config.clone(), session),
        None => Host::live(config.clone()),
    };

    let result = execute(command, &mut host, &config);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop the host first to release recorder references
        drop(host);
        finish_recording(session)?;
    }

    println!("{}", result?);
    Ok(())
}

/// Runs one command against `host` and then ends the unit of work with
/// [`Host::command_completed`], returning the command's output.
///
/// # Errors
///
/// Returns the command's error, or the IRC disconnect error if the command
/// itself succeeded.
pub fn execute(command: &Command, host: &mut Host, config: &HostConfig) -> Result<String, String> {
    tracing::debug!(?command, "running command");
    let result = run_command(command, host, config);
    let completed = host.command_completed().map_err(|e| e.to_string());
    let output = result?;
    completed?;
    Ok(output)
}

fn run_command(command: &Command, host: &mut Host, config: &HostConfig) -> Result<String, String> {
    match command {
        Command::Info => info::run(host),
        Command::Scm { patch_dirs } => scm::run(host, patch_dirs),
        Command::Watchlist { patch } => watchlist::run(host, patch.as_deref()),
        Command::Bots { chromium } => bots::run(host, *chromium),
        Command::Bug { id } => bug::run(host, *id),
        Command::PatchStatus { queue, attachment } => patch_status::run(host, queue, *attachment),
        Command::IrcSay { message, yes } => irc::run(host, &config.irc, message, *yes),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
