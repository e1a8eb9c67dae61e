//! `devhost bug` command.

use crate::host::Host;

/// Execute the `bug` command.
///
/// # Errors
///
/// Returns an error string if the bug cannot be fetched.
pub fn run(host: &Host, id: u64) -> Result<String, String> {
    let bug = host.bugs.fetch_bug(id).map_err(|e| e.to_string())?;
    let status = if bug.is_open() { bug.status.clone() } else { format!("{} {}", bug.status, bug.resolution) };
    let assignee = if bug.assigned_to.is_empty() { "nobody" } else { bug.assigned_to.as_str() };
    Ok([
        format!("Bug {}: {}", bug.id, bug.summary),
        format!("Status:   {status}"),
        format!("Assignee: {assignee}"),
        format!("URL:      {}", host.bugs.bug_url_for_bug_id(bug.id)),
    ]
    .join("\n"))
}
