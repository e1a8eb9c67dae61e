//! `devhost info` command.

use crate::host::Host;

/// Execute the `info` command.
///
/// Reports the platform, the default layout-test port and the detected
/// working copy. A missing working copy is reported, not treated as an error.
///
/// # Errors
///
/// Returns an error string if the default port cannot be selected.
pub fn run(host: &mut Host) -> Result<String, String> {
    let port = host.port_factory.get(None).map_err(|e| e.to_string())?;
    let mut lines = vec![
        format!("Platform:       {}", host.platform.display_name()),
        format!("CPUs:           {}", host.executive.cpu_count()),
        format!("Default port:   {} ({})", port.name(), port.baseline_search_path().join(" > ")),
    ];

    match host.initialize_scm(None) {
        Ok(()) => {
            if let Some(scm) = host.scm() {
                lines.push(format!("Source control: {} at {}", scm.name(), scm.checkout_root().display()));
            }
        }
        Err(e) => lines.push(format!("Source control: none ({e})")),
    }
    lines.push(format!("Build master:   {}", host.buildbot.base_url()));
    Ok(lines.join("\n"))
}
