//! `devhost patch-status` command.

use crate::host::Host;

/// Execute the `patch-status` command.
///
/// # Errors
///
/// Returns an error string if the status server cannot be reached.
pub fn run(host: &Host, queue: &str, attachment: u64) -> Result<String, String> {
    let status = host.status_server.patch_status(queue, attachment).map_err(|e| e.to_string())?;
    Ok(match status {
        Some(status) => format!("{queue} on attachment {attachment}: {status}"),
        None => format!("{queue} has no status for attachment {attachment}."),
    })
}
