//! Loads the watch list through the filesystem port.

use std::path::PathBuf;
use std::sync::Arc;

use super::WatchList;
use crate::error::WatchListError;
use crate::ports::FileSystem;

/// Reads and parses a watch-list file.
pub struct WatchListLoader {
    filesystem: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl WatchListLoader {
    /// Creates a loader for `path`. A relative path is resolved against the
    /// filesystem's working directory at load time.
    #[must_use]
    pub fn new(filesystem: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self { filesystem, path: path.into() }
    }

    /// Reads and parses the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(&self) -> Result<WatchList, WatchListError> {
        let path = if self.path.is_absolute() {
            self.path.clone()
        } else {
            let cwd = self
                .filesystem
                .current_dir()
                .map_err(|e| WatchListError::Read { path: self.path.clone(), message: e.to_string() })?;
            cwd.join(&self.path)
        };
        let contents = self
            .filesystem
            .read_to_string(&path)
            .map_err(|e| WatchListError::Read { path: path.clone(), message: e.to_string() })?;
        let list = WatchList::parse(&contents)?;
        tracing::debug!(path = %path.display(), definitions = list.definition_names().len(), "watch list loaded");
        Ok(list)
    }
}
