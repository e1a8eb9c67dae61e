//! Minimal unified-diff reader: which files changed and which lines were
//! added or removed. Hunk positions are ignored.

use std::path::PathBuf;

/// The lines a patch adds to and removes from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the checkout root.
    pub path: PathBuf,
    /// Added lines, without the leading `+`.
    pub added_lines: Vec<String>,
    /// Removed lines, without the leading `-`.
    pub removed_lines: Vec<String>,
}

impl FileChange {
    /// A change to `path` with no line information.
    #[must_use]
    pub fn path_only(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }
}

/// Splits a git- or svn-style unified diff into per-file changes.
#[must_use]
pub fn parse_diff(patch: &str) -> Vec<FileChange> {
    let mut changes: Vec<FileChange> = Vec::new();
    let mut in_header = false;

    for line in patch.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            // "a/path b/path"; the b-side wins if "+++" is missing (binary files).
            let path = rest.rsplit_once(" b/").map_or(rest, |(_, b)| b);
            changes.push(FileChange::path_only(path));
            in_header = true;
        } else if let Some(path) = line.strip_prefix("Index: ") {
            changes.push(FileChange::path_only(path.trim()));
            in_header = true;
        } else if let Some(rest) = line.strip_prefix("+++ ").filter(|_| in_header || changes.is_empty()) {
            let path = rest.split('\t').next().unwrap_or(rest).trim();
            let path = path.strip_prefix("b/").unwrap_or(path);
            if !in_header {
                changes.push(FileChange::path_only(path));
            } else if let Some(current) = changes.last_mut().filter(|_| path != "/dev/null") {
                current.path = PathBuf::from(path);
            }
            in_header = false;
        } else if line.starts_with("@@") {
            in_header = false;
        } else if let Some(current) = changes.last_mut().filter(|_| !in_header) {
            // Header lines ("index", "---", "new file mode") only appear while in_header.
            if let Some(added) = line.strip_prefix('+') {
                current.added_lines.push(added.to_string());
            } else if let Some(removed) = line.strip_prefix('-') {
                current.removed_lines.push(removed.to_string());
            }
        }
    }
    changes
}
