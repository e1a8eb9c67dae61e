//! Live web adapter using the blocking `reqwest` client.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::ports::{PortResult, Web};

const USER_AGENT: &str = concat!("devhost/", env!("CARGO_PKG_VERSION"));

/// Live HTTP adapter.
///
/// The underlying client is built on the first request so that constructing
/// a host stays free of side effects.
pub struct LiveWeb {
    client: OnceLock<Client>,
    timeout: Duration,
}

impl LiveWeb {
    /// Creates a web adapter whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { client: OnceLock::new(), timeout }
    }

    fn client(&self) -> PortResult<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(self.client.get_or_init(|| built))
    }
}

impl Default for LiveWeb {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Web for LiveWeb {
    fn get_text(&self, url: &str) -> PortResult<String> {
        tracing::debug!(%url, "GET");
        let response = self
            .client()?
            .get(url)
            .send()
            .map_err(|e| format!("request to {url} failed: {e}"))?;
        let status = response.status();
        let body = response.text().map_err(|e| format!("failed to read body of {url}: {e}"))?;
        if !status.is_success() {
            return Err(format!("GET {url} returned {}", status.as_u16()).into());
        }
        Ok(body)
    }
}
