//! In-memory filesystem for tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::ports::filesystem::FileSystem;
use crate::ports::PortResult;

#[derive(Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl Tree {
    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self.files.keys().any(|f| f != path && f.starts_with(path))
            || self.dirs.iter().any(|d| d != path && d.starts_with(path))
    }
}

/// A filesystem held entirely in memory.
///
/// Directories exist implicitly as ancestors of files, or explicitly via
/// [`MemoryFileSystem::create_dir`].
pub struct MemoryFileSystem {
    tree: Mutex<Tree>,
    cwd: PathBuf,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem whose working directory is `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { tree: Mutex::new(Tree::default()), cwd: cwd.into() }
    }

    /// Builder-style helper that adds a file.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner).files.insert(path.into(), contents.into());
        self
    }

    /// Builder-style helper that adds an empty directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.create_dir(path);
        self
    }

    /// Adds an empty directory.
    pub fn create_dir(&self, path: impl Into<PathBuf>) {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner).dirs.insert(path.into());
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        let tree = self.tree.lock().map_err(|_| "memory fs lock poisoned")?;
        tree.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("no such file: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> PortResult<()> {
        let mut tree = self.tree.lock().map_err(|_| "memory fs lock poisoned")?;
        if tree.dirs.contains(path) {
            return Err(format!("is a directory: {}", path.display()).into());
        }
        tree.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.tree
            .lock()
            .is_ok_and(|tree| tree.files.contains_key(path) || tree.is_dir(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.tree.lock().is_ok_and(|tree| tree.is_dir(path))
    }

    fn list_dir(&self, path: &Path) -> PortResult<Vec<String>> {
        let tree = self.tree.lock().map_err(|_| "memory fs lock poisoned")?;
        if !tree.is_dir(path) {
            return Err(format!("not a directory: {}", path.display()).into());
        }
        let names: BTreeSet<String> = tree
            .files
            .keys()
            .chain(tree.dirs.iter())
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn current_dir(&self) -> PortResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}
