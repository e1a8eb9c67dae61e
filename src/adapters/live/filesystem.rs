//! Live filesystem adapter using `std::fs`.

use std::path::{Path, PathBuf};

use crate::ports::filesystem::FileSystem;
use crate::ports::PortResult;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> PortResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> PortResult<Vec<String>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn current_dir(&self) -> PortResult<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}
