//! Platform port describing the host operating system.

/// Describes the operating system the tool runs on.
pub trait PlatformInfo: Send + Sync {
    /// Short OS name: `"mac"`, `"win"`, `"linux"`, `"freebsd"`, or the raw
    /// name for anything else.
    fn os_name(&self) -> String;

    /// OS release string, if it can be determined.
    fn os_version(&self) -> Option<String>;

    /// Returns `true` on macOS.
    fn is_mac(&self) -> bool {
        self.os_name() == "mac"
    }

    /// Returns `true` on Windows.
    fn is_win(&self) -> bool {
        self.os_name() == "win"
    }

    /// Returns `true` on Linux.
    fn is_linux(&self) -> bool {
        self.os_name() == "linux"
    }

    /// Human-readable name including the version when known.
    fn display_name(&self) -> String {
        match self.os_version() {
            Some(version) => format!("{} {version}", self.os_name()),
            None => self.os_name(),
        }
    }
}
