//! Replaying adapter for the `Executive` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CommandOutput, Executive, PortResult};

/// Answers process runs from a cassette instead of spawning anything.
pub struct ReplayingExecutive {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingExecutive {
    /// Creates a replaying executive from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Executive for ReplayingExecutive {
    fn run_command(&self, _argv: &[&str], _cwd: Option<&Path>) -> PortResult<CommandOutput> {
        replay_result(&self.replayer, "executive", "run_command")
    }

    fn cpu_count(&self) -> usize {
        match next_output(&self.replayer, "executive", "cpu_count") {
            Ok(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0)
                .unwrap_or(1),
            Err(e) => {
                tracing::warn!(error = %e, "no recorded cpu_count, assuming 1");
                1
            }
        }
    }
}
