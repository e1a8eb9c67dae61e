//! `devhost scm` command.

use std::path::PathBuf;

use crate::host::Host;

/// Execute the `scm` command.
///
/// # Errors
///
/// Returns an error string if no working copy is found or the backend
/// commands fail.
pub fn run(host: &mut Host, patch_dirs: &[PathBuf]) -> Result<String, String> {
    let dirs = (!patch_dirs.is_empty()).then_some(patch_dirs);
    host.initialize_scm(dirs).map_err(|e| e.to_string())?;
    let checkout = host.checkout().ok_or_else(|| "Source control was not initialized".to_string())?;
    let scm = checkout.scm();

    let mut lines = vec![
        format!("System:    {}", scm.name()),
        format!("Root:      {}", scm.checkout_root().display()),
        format!("Revision:  {}", scm.current_revision().map_err(|e| e.to_string())?),
    ];
    if !scm.patch_directories().is_empty() {
        let dirs: Vec<String> = scm.patch_directories().iter().map(|d| d.display().to_string()).collect();
        lines.push(format!("Limited to: {}", dirs.join(", ")));
    }

    let changelogs = checkout.modified_changelogs().map_err(|e| e.to_string())?;
    let others = checkout.modified_non_changelogs().map_err(|e| e.to_string())?;
    if changelogs.is_empty() && others.is_empty() {
        lines.push("No local changes.".to_string());
        return Ok(lines.join("\n"));
    }
    for (title, paths) in [("ChangeLogs", &changelogs), ("Other changes", &others)] {
        if paths.is_empty() {
            continue;
        }
        lines.push(format!("{title}:"));
        lines.extend(paths.iter().map(|p| format!("  {}", p.display())));
    }
    Ok(lines.join("\n"))
}
