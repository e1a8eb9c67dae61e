//! Commit-queue status server client.

use std::sync::Arc;

use super::{fetch, join_url};
use crate::error::NetError;
use crate::ports::Web;

/// Client for the status server that tracks queue results per patch.
pub struct StatusServer {
    base_url: String,
    web: Arc<dyn Web>,
}

impl StatusServer {
    /// Creates a client for `base_url`. Performs no I/O.
    #[must_use]
    pub fn new(base_url: impl Into<String>, web: Arc<dyn Web>) -> Self {
        Self { base_url: base_url.into(), web }
    }

    /// Latest status line `queue` reported for an attachment, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached.
    pub fn patch_status(&self, queue: &str, attachment_id: u64) -> Result<Option<String>, NetError> {
        let url = join_url(&self.base_url, &format!("patch-status/{queue}/{attachment_id}"));
        let body = fetch(self.web.as_ref(), &url)?;
        let status = body.trim();
        Ok((!status.is_empty()).then(|| status.to_string()))
    }
}
