//! Live platform information from the compile target and `uname`.

use std::sync::Arc;

use crate::ports::executive::run_and_check;
use crate::ports::{Executive, PlatformInfo};

/// Live platform adapter.
///
/// The OS name comes from the compile target. The version is looked up
/// through the executive on each call, never at construction.
pub struct LivePlatformInfo {
    executive: Arc<dyn Executive>,
}

impl LivePlatformInfo {
    /// Creates a platform adapter that queries versions through `executive`.
    #[must_use]
    pub fn new(executive: Arc<dyn Executive>) -> Self {
        Self { executive }
    }
}

/// Maps a Rust target OS name to the short names the tooling uses.
pub(crate) fn short_os_name(target_os: &str) -> String {
    match target_os {
        "macos" => "mac".to_string(),
        "windows" => "win".to_string(),
        other => other.to_string(),
    }
}

impl PlatformInfo for LivePlatformInfo {
    fn os_name(&self) -> String {
        short_os_name(std::env::consts::OS)
    }

    fn os_version(&self) -> Option<String> {
        let argv: &[&str] = if self.is_mac() {
            &["sw_vers", "-productVersion"]
        } else if self.is_win() {
            &["cmd", "/c", "ver"]
        } else {
            &["uname", "-r"]
        };
        match run_and_check(self.executive.as_ref(), argv, None) {
            Ok(out) => Some(out.trim().to_string()).filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::debug!(error = %e, "could not determine OS version");
                None
            }
        }
    }
}
