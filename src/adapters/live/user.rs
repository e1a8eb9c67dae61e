//! Live user adapter reading stdin and writing stdout.

use std::io::{self, BufRead, Write};

use crate::ports::user::User;
use crate::ports::PortResult;

/// Live user adapter bound to the process terminal.
pub struct LiveUser;

impl User for LiveUser {
    fn prompt(&self, message: &str) -> PortResult<String> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
