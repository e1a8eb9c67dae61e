//! Source-control backends and checkout detection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ScmError;
use crate::host::HostServices;
use crate::ports::executive::run_and_check;
use crate::ports::Executive;

/// A source-control working copy.
pub trait Scm: Send + Sync {
    /// Short system name, e.g. `"git"`.
    fn name(&self) -> &'static str;

    /// Top directory of the working copy.
    fn checkout_root(&self) -> &Path;

    /// Directories (relative to the root) that queries are limited to.
    /// Empty means the whole checkout.
    fn patch_directories(&self) -> &[PathBuf];

    /// Identifier of the checked-out revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend command fails.
    fn current_revision(&self) -> Result<String, ScmError>;

    /// Paths (relative to the root) with local modifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend command fails.
    fn changed_files(&self) -> Result<Vec<PathBuf>, ScmError>;

    /// Unified diff of local modifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend command fails.
    fn create_patch(&self) -> Result<String, ScmError>;
}

/// Finds the working copy enclosing the current directory.
///
/// Walks up from `filesystem.current_dir()` and picks the first directory
/// holding a `.git` entry (Git) or a `.svn` directory (Subversion).
///
/// # Errors
///
/// Returns [`ScmError::NotFound`] when no ancestor is a working copy.
pub fn default_scm(
    services: &HostServices,
    patch_directories: Option<&[PathBuf]>,
) -> Result<Arc<dyn Scm>, ScmError> {
    let cwd = services
        .filesystem
        .current_dir()
        .map_err(|e| ScmError::WorkingDirectory(e.to_string()))?;
    let patch_directories = patch_directories.map(<[PathBuf]>::to_vec).unwrap_or_default();

    for dir in cwd.ancestors() {
        if services.filesystem.exists(&dir.join(".git")) {
            tracing::debug!(root = %dir.display(), "detected git checkout");
            return Ok(Arc::new(Git::new(dir, patch_directories, Arc::clone(&services.executive))));
        }
        if services.filesystem.is_dir(&dir.join(".svn")) {
            tracing::debug!(root = %dir.display(), "detected subversion checkout");
            return Ok(Arc::new(Svn::new(dir, patch_directories, Arc::clone(&services.executive))));
        }
    }
    Err(ScmError::NotFound(cwd))
}

fn path_args(patch_directories: &[PathBuf]) -> Vec<String> {
    patch_directories.iter().map(|p| p.to_string_lossy().into_owned()).collect()
}

/// Git working copy.
pub struct Git {
    root: PathBuf,
    patch_directories: Vec<PathBuf>,
    executive: Arc<dyn Executive>,
}

impl Git {
    /// Creates a Git backend rooted at `root`.
    #[must_use]
    pub fn new(root: &Path, patch_directories: Vec<PathBuf>, executive: Arc<dyn Executive>) -> Self {
        Self { root: root.to_path_buf(), patch_directories, executive }
    }

    fn git(&self, args: &[&str]) -> Result<String, ScmError> {
        let extra = path_args(&self.patch_directories);
        let mut argv = vec!["git"];
        argv.extend_from_slice(args);
        if !extra.is_empty() {
            argv.push("--");
            argv.extend(extra.iter().map(String::as_str));
        }
        run_and_check(self.executive.as_ref(), &argv, Some(&self.root))
            .map_err(|e| ScmError::Command { system: "git", message: e.to_string() })
    }
}

impl Scm for Git {
    fn name(&self) -> &'static str {
        "git"
    }

    fn checkout_root(&self) -> &Path {
        &self.root
    }

    fn patch_directories(&self) -> &[PathBuf] {
        &self.patch_directories
    }

    fn current_revision(&self) -> Result<String, ScmError> {
        run_and_check(self.executive.as_ref(), &["git", "rev-parse", "HEAD"], Some(&self.root))
            .map(|out| out.trim().to_string())
            .map_err(|e| ScmError::Command { system: "git", message: e.to_string() })
    }

    fn changed_files(&self) -> Result<Vec<PathBuf>, ScmError> {
        let out = self.git(&["diff", "--name-only", "HEAD"])?;
        Ok(out.lines().filter(|l| !l.is_empty()).map(PathBuf::from).collect())
    }

    fn create_patch(&self) -> Result<String, ScmError> {
        self.git(&["diff", "--binary", "HEAD"])
    }
}

/// Subversion working copy.
pub struct Svn {
    root: PathBuf,
    patch_directories: Vec<PathBuf>,
    executive: Arc<dyn Executive>,
}

impl Svn {
    /// Creates a Subversion backend rooted at `root`.
    #[must_use]
    pub fn new(root: &Path, patch_directories: Vec<PathBuf>, executive: Arc<dyn Executive>) -> Self {
        Self { root: root.to_path_buf(), patch_directories, executive }
    }

    fn svn(&self, args: &[&str]) -> Result<String, ScmError> {
        let extra = path_args(&self.patch_directories);
        let mut argv = vec!["svn"];
        argv.extend_from_slice(args);
        argv.extend(extra.iter().map(String::as_str));
        run_and_check(self.executive.as_ref(), &argv, Some(&self.root))
            .map_err(|e| ScmError::Command { system: "svn", message: e.to_string() })
    }
}

impl Scm for Svn {
    fn name(&self) -> &'static str {
        "svn"
    }

    fn checkout_root(&self) -> &Path {
        &self.root
    }

    fn patch_directories(&self) -> &[PathBuf] {
        &self.patch_directories
    }

    fn current_revision(&self) -> Result<String, ScmError> {
        run_and_check(
            self.executive.as_ref(),
            &["svn", "info", "--show-item", "revision"],
            Some(&self.root),
        )
        .map(|out| out.trim().to_string())
        .map_err(|e| ScmError::Command { system: "svn", message: e.to_string() })
    }

    fn changed_files(&self) -> Result<Vec<PathBuf>, ScmError> {
        let out = self.svn(&["status", "-q"])?;
        // Seven status columns and a space precede the path.
        Ok(out
            .lines()
            .filter_map(|line| line.get(8..))
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn create_patch(&self) -> Result<String, ScmError> {
        self.svn(&["diff"])
    }
}
