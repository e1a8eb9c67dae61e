//! `devhost irc-say` command.

use std::sync::Arc;

use crate::config::IrcConfig;
use crate::error::IrcError;
use crate::host::Host;
use crate::ports::IrcDelegate;

/// IRC identity for an interactive command-line session.
struct CommandLineDelegate {
    nickname: String,
    password: Option<String>,
}

impl IrcDelegate for CommandLineDelegate {
    fn irc_nickname(&self) -> String {
        self.nickname.clone()
    }

    fn irc_password(&self) -> Option<String> {
        self.password.clone()
    }

    fn irc_message_received(&self, nick: &str, message: &str) {
        tracing::info!(from = nick, "{message}");
    }
}

/// Execute the `irc-say` command.
///
/// Asks for confirmation unless `yes` is set. The connection is left open;
/// the dispatcher closes it through [`Host::command_completed`].
///
/// # Errors
///
/// Returns an error string if prompting, connecting or posting fails.
pub fn run(host: &mut Host, irc: &IrcConfig, message: &str, yes: bool) -> Result<String, String> {
    if !yes {
        let prompt = format!("Post {message:?} to {} on {}?", irc.channel, irc.server);
        if !host.user.confirm(&prompt, false).map_err(|e| e.to_string())? {
            return Ok("Not posted.".to_string());
        }
    }

    let delegate = CommandLineDelegate { nickname: irc.nickname.clone(), password: irc.password.clone() };
    host.ensure_irc_connected(Arc::new(delegate)).map_err(|e| e.to_string())?;
    let connection = host.irc_mut().ok_or_else(|| IrcError::NotConnected.to_string())?;
    connection.post(message).map_err(|e| IrcError::Send(e.to_string()).to_string())?;
    let received = connection.pump().map_err(|e| IrcError::Send(e.to_string()).to_string())?;
    tracing::debug!(received, "pumped IRC after posting");
    Ok(format!("Posted to {}.", irc.channel))
}
