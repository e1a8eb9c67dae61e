//! `devhost bots` command.

use crate::host::Host;
use crate::net::BuilderStatus;

/// Execute the `bots` command.
///
/// # Errors
///
/// Returns an error string if the build master cannot be queried.
pub fn run(host: &Host, chromium: bool) -> Result<String, String> {
    let (url, builders) = if chromium {
        let bot = host.chromium_buildbot().map_err(|e| e.to_string())?;
        (bot.buildbot().base_url().to_string(), bot.webkit_builders().map_err(|e| e.to_string())?)
    } else {
        (host.buildbot.base_url().to_string(), host.buildbot.builder_statuses().map_err(|e| e.to_string())?)
    };
    Ok(render(&url, &builders))
}

fn render(url: &str, builders: &[BuilderStatus]) -> String {
    if builders.is_empty() {
        return format!("{url}: no builders.");
    }
    let width = builders.iter().map(|b| b.name.len()).max().unwrap_or(0);
    let mut lines = vec![format!("{url}:")];
    for builder in builders {
        let mark = if builder.is_green() { "ok" } else { "RED" };
        lines.push(format!("  {:<width$}  {:<8}  {mark}", builder.name, builder.state));
    }
    let red = builders.iter().filter(|b| !b.is_green()).count();
    lines.push(if red == 0 {
        "All builders are green.".to_string()
    } else {
        format!("{red} of {} builders are red.", builders.len())
    });
    lines.join("\n")
}
