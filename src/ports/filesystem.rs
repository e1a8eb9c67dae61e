//! Filesystem port for file I/O operations.

use std::path::{Path, PathBuf};

use super::PortResult;

/// Provides filesystem access for reading and writing files.
///
/// Abstracting the filesystem lets source-control detection and the
/// watch-list loader run against an in-memory tree in tests.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> PortResult<String>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> PortResult<()>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists the entry names in a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(&self, path: &Path) -> PortResult<Vec<String>>;

    /// Returns the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable.
    fn current_dir(&self) -> PortResult<PathBuf>;
}
