//! Executive port for running external processes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PortResult;

/// The output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` if the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns external processes.
///
/// Abstracting process execution allows deterministic replay by recording
/// and replaying command outputs during cassette playback.
pub trait Executive: Send + Sync {
    /// Runs `argv[0]` with the remaining arguments and returns its output.
    ///
    /// A non-zero exit is not an error here; see [`run_and_check`].
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty or the process cannot be spawned.
    fn run_command(&self, argv: &[&str], cwd: Option<&Path>) -> PortResult<CommandOutput>;

    /// Number of logical CPUs available to child processes.
    fn cpu_count(&self) -> usize;
}

/// Runs a command and turns a non-zero exit into an error carrying stderr.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned or exits non-zero.
pub fn run_and_check(
    executive: &dyn Executive,
    argv: &[&str],
    cwd: Option<&Path>,
) -> PortResult<String> {
    let output = executive.run_command(argv, cwd)?;
    if !output.success() {
        return Err(format!(
            "{} failed with exit code {}: {}",
            argv.join(" "),
            output.exit_code,
            output.stderr.trim()
        )
        .into());
    }
    Ok(output.stdout)
}
