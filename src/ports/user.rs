//! User port for interactive terminal I/O.

use super::PortResult;

/// Talks to the person running the tool.
pub trait User: Send + Sync {
    /// Shows `message` and returns the line the user typed, without the newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    fn prompt(&self, message: &str) -> PortResult<String>;

    /// Asks a yes/no question. An empty answer selects `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    fn confirm(&self, message: &str, default: bool) -> PortResult<bool> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.prompt(&format!("{message} {suffix}: "))?;
        Ok(parse_confirmation(&answer, default))
    }
}

/// Interprets a yes/no answer.
#[must_use]
pub fn parse_confirmation(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
