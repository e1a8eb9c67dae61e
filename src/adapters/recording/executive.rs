//! Recording adapter for the `Executive` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CommandOutput, Executive, PortResult};

/// Records process runs while delegating to an inner executive.
pub struct RecordingExecutive {
    inner: Arc<dyn Executive>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingExecutive {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Arc<dyn Executive>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RunInput<'a> {
    argv: &'a [&'a str],
    cwd: Option<&'a Path>,
}

impl Executive for RecordingExecutive {
    fn run_command(&self, argv: &[&str], cwd: Option<&Path>) -> PortResult<CommandOutput> {
        let result = self.inner.run_command(argv, cwd);
        record_result(&self.recorder, "executive", "run_command", &RunInput { argv, cwd }, &result);
        result
    }

    fn cpu_count(&self) -> usize {
        let count = self.inner.cpu_count();
        record_interaction(&self.recorder, "executive", "cpu_count", &serde_json::json!({}), &count);
        count
    }
}
