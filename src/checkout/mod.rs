//! Checkout wrapper around the active source-control backend.

pub mod scm;

use std::path::PathBuf;
use std::sync::Arc;

pub use scm::{default_scm, Git, Scm, Svn};

use crate::error::ScmError;

/// Higher-level operations on a working copy.
///
/// A checkout always wraps exactly one [`Scm`]; the host creates both in
/// one step.
#[derive(Clone)]
pub struct Checkout {
    scm: Arc<dyn Scm>,
}

impl Checkout {
    /// Wraps `scm`.
    #[must_use]
    pub fn new(scm: Arc<dyn Scm>) -> Self {
        Self { scm }
    }

    /// The wrapped backend.
    #[must_use]
    pub fn scm(&self) -> &Arc<dyn Scm> {
        &self.scm
    }

    /// Changed files named `ChangeLog`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot list changes.
    pub fn modified_changelogs(&self) -> Result<Vec<PathBuf>, ScmError> {
        Ok(self.scm.changed_files()?.into_iter().filter(|p| is_changelog(p)).collect())
    }

    /// Changed files other than `ChangeLog`s.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot list changes.
    pub fn modified_non_changelogs(&self) -> Result<Vec<PathBuf>, ScmError> {
        Ok(self.scm.changed_files()?.into_iter().filter(|p| !is_changelog(p)).collect())
    }
}

fn is_changelog(path: &std::path::Path) -> bool {
    path.file_name().is_some_and(|name| name == "ChangeLog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct FixedScm(Vec<PathBuf>);

    impl Scm for FixedScm {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn checkout_root(&self) -> &Path {
            Path::new("/src")
        }
        fn patch_directories(&self) -> &[PathBuf] {
            &[]
        }
        fn current_revision(&self) -> Result<String, ScmError> {
            Ok("1".into())
        }
        fn changed_files(&self) -> Result<Vec<PathBuf>, ScmError> {
            Ok(self.0.clone())
        }
        fn create_patch(&self) -> Result<String, ScmError> {
            Ok(String::new())
        }
    }

    #[test]
    fn splits_changelogs_from_other_changes() {
        let checkout = Checkout::new(Arc::new(FixedScm(vec![
            PathBuf::from("Source/WebCore/ChangeLog"),
            PathBuf::from("Source/WebCore/dom/Node.cpp"),
            PathBuf::from("Tools/ChangeLog-2011-01-01"),
        ])));
        assert_eq!(checkout.modified_changelogs().unwrap(), vec![PathBuf::from("Source/WebCore/ChangeLog")]);
        assert_eq!(checkout.modified_non_changelogs().unwrap().len(), 2);
    }
}
