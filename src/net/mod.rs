//! Service clients that talk HTTP through the [`Web`](crate::ports::Web) port.

pub mod bugzilla;
pub mod buildbot;
pub mod status_server;

pub use bugzilla::{Bug, Bugzilla};
pub use buildbot::{BuildBot, BuilderStatus, ChromiumBuildBot};
pub use status_server::StatusServer;

use crate::error::NetError;
use crate::ports::Web;

/// Fetches `url` and maps transport failures to [`NetError::Request`].
pub(crate) fn fetch(web: &dyn Web, url: &str) -> Result<String, NetError> {
    web.get_text(url).map_err(|e| NetError::Request { url: url.to_string(), message: e.to_string() })
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::ports::{PortResult, Web};

    /// Serves canned bodies by URL and remembers what was asked for.
    #[derive(Default)]
    pub struct CannedWeb {
        pub pages: HashMap<String, String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl CannedWeb {
        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Web for CannedWeb {
        fn get_text(&self, url: &str) -> PortResult<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| format!("GET {url} returned 404").into())
        }
    }
}
