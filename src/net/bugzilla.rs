//! Bugzilla client over the REST API.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{fetch, join_url};
use crate::error::NetError;
use crate::ports::Web;

/// A bug as reported by Bugzilla.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
    /// Bug number.
    pub id: u64,
    /// One-line summary.
    pub summary: String,
    /// Workflow status, e.g. `NEW` or `RESOLVED`.
    pub status: String,
    /// Resolution, empty while open.
    #[serde(default)]
    pub resolution: String,
    /// Assignee e-mail.
    #[serde(default)]
    pub assigned_to: String,
}

impl Bug {
    /// Returns `true` while the bug has no resolution.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.resolution.is_empty()
    }
}

#[derive(Deserialize)]
struct BugsResponse {
    #[serde(default)]
    bugs: Vec<Bug>,
}

/// Client for one Bugzilla instance.
pub struct Bugzilla {
    base_url: String,
    web: Arc<dyn Web>,
}

impl Bugzilla {
    /// Creates a client for `base_url`. Performs no I/O.
    #[must_use]
    pub fn new(base_url: impl Into<String>, web: Arc<dyn Web>) -> Self {
        Self { base_url: base_url.into(), web }
    }

    /// Human-facing URL for a bug.
    #[must_use]
    pub fn bug_url_for_bug_id(&self, id: u64) -> String {
        join_url(&self.base_url, &format!("show_bug.cgi?id={id}"))
    }

    /// Fetches a bug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body is not the expected
    /// JSON, or the bug does not exist.
    pub fn fetch_bug(&self, id: u64) -> Result<Bug, NetError> {
        let url = join_url(&self.base_url, &format!("rest/bug/{id}"));
        let body = fetch(self.web.as_ref(), &url)?;
        let response: BugsResponse = serde_json::from_str(&body)
            .map_err(|e| NetError::Decode { url: url.clone(), message: e.to_string() })?;
        response.bugs.into_iter().find(|bug| bug.id == id).ok_or(NetError::BugNotFound(id))
    }
}
