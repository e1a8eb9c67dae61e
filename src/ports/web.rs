//! Web port for HTTP fetches.

use super::PortResult;

/// Fetches resources over HTTP.
///
/// Every network client in `crate::net` goes through this port so that
/// their traffic can be recorded and replayed.
pub trait Web: Send + Sync {
    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn get_text(&self, url: &str) -> PortResult<String>;
}
