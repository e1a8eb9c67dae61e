//! Scratch-file helpers built on the filesystem and executive ports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ports::executive::run_and_check;
use crate::ports::{Executive, FileSystem, PortResult};

/// Default number of numbered candidates tried by
/// [`Workspace::find_unused_filename`].
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Helpers for picking output paths and packaging directories.
#[derive(Clone)]
pub struct Workspace {
    filesystem: Arc<dyn FileSystem>,
    executive: Arc<dyn Executive>,
}

impl Workspace {
    /// Creates a workspace over the given filesystem and executive.
    #[must_use]
    pub fn new(filesystem: Arc<dyn FileSystem>, executive: Arc<dyn Executive>) -> Self {
        Self { filesystem, executive }
    }

    /// Returns `dir/name.ext` if it is free, otherwise the first free
    /// `dir/name-N.ext` for N in `1..=search_limit`.
    #[must_use]
    pub fn find_unused_filename(
        &self,
        dir: &Path,
        name: &str,
        extension: &str,
        search_limit: usize,
    ) -> Option<PathBuf> {
        let plain = dir.join(format!("{name}.{extension}"));
        if !self.filesystem.exists(&plain) {
            return Some(plain);
        }
        (1..=search_limit)
            .map(|n| dir.join(format!("{name}-{n}.{extension}")))
            .find(|candidate| !self.filesystem.exists(candidate))
    }

    /// Zips the contents of `source` into `zip_path` using the system `zip`.
    ///
    /// # Errors
    ///
    /// Returns an error if `zip` cannot be run or exits non-zero.
    pub fn create_zip(&self, zip_path: &Path, source: &Path) -> PortResult<PathBuf> {
        let zip_arg = zip_path.to_string_lossy().into_owned();
        let argv = ["zip", "-9", "-r", zip_arg.as_str(), "."];
        run_and_check(self.executive.as_ref(), &argv, Some(source))?;
        Ok(zip_path.to_path_buf())
    }
}
