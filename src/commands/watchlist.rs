//! `devhost watchlist` command.

use std::path::Path;

use crate::host::Host;
use crate::watchlist::parse_diff;

/// Execute the `watchlist` command.
///
/// Matches the diff from `patch` (or the working copy's local changes)
/// against the watch list and reports who to cc and what to say.
///
/// # Errors
///
/// Returns an error string if the watch list or the diff cannot be read.
pub fn run(host: &mut Host, patch: Option<&Path>) -> Result<String, String> {
    let list = host.watch_list().map_err(|e| e.to_string())?;
    let diff = match patch {
        Some(path) => host
            .filesystem
            .read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => {
            host.initialize_scm(None).map_err(|e| e.to_string())?;
            let scm = host.scm().ok_or_else(|| "Source control was not initialized".to_string())?;
            scm.create_patch().map_err(|e| e.to_string())?
        }
    };

    let changes = parse_diff(&diff);
    let matched = list.find_matching_definitions(&changes);
    if matched.is_empty() {
        return Ok(format!("{} changed file(s); no watch-list definitions matched.", changes.len()));
    }

    let result = list.determine_cc_and_messages(&changes);
    let mut lines = vec![format!("Matched: {}", matched.into_iter().collect::<Vec<_>>().join(", "))];
    if !result.cc.is_empty() {
        lines.push(format!("CC: {}", result.cc.join(", ")));
    }
    lines.extend(result.messages.iter().map(|m| format!("Message: {m}")));
    Ok(lines.join("\n"))
}
