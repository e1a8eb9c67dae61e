//! Live executive using `std::process::Command`.

use std::path::Path;
use std::process::Command;

use crate::ports::executive::{CommandOutput, Executive};
use crate::ports::PortResult;

/// Live executive that spawns real child processes.
pub struct LiveExecutive;

impl Executive for LiveExecutive {
    fn run_command(&self, argv: &[&str], cwd: Option<&Path>) -> PortResult<CommandOutput> {
        let (program, args) = argv.split_first().ok_or("run_command called with empty argv")?;
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        tracing::debug!(command = %argv.join(" "), "running");
        let output = command
            .output()
            .map_err(|e| format!("failed to spawn {program}: {e}"))?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn cpu_count(&self) -> usize {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_echo_command() {
        let result = LiveExecutive.run_command(&["echo", "hello"], None).unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn captures_exit_code() {
        let result = LiveExecutive.run_command(&["sh", "-c", "exit 42"], None).unwrap();

        assert_eq!(result.exit_code, 42);
    }

    #[test]
    fn honours_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = LiveExecutive.run_command(&["pwd"], Some(dir.path())).unwrap();
        let reported = std::path::PathBuf::from(result.stdout.trim());

        assert_eq!(reported.canonicalize().unwrap(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn empty_argv_is_an_error() {
        assert!(LiveExecutive.run_command(&[], None).is_err());
    }

    #[test]
    fn cpu_count_is_positive() {
        assert!(LiveExecutive.cpu_count() >= 1);
    }
}
