//! Recording adapter for the `Web` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{PortResult, Web};

/// Records HTTP fetches while delegating to an inner web adapter.
pub struct RecordingWeb {
    inner: Arc<dyn Web>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingWeb {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Arc<dyn Web>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct UrlInput<'a> {
    url: &'a str,
}

impl Web for RecordingWeb {
    fn get_text(&self, url: &str) -> PortResult<String> {
        let result = self.inner.get_text(url);
        record_result(&self.recorder, "web", "get_text", &UrlInput { url }, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;

    struct Unreachable;

    impl Web for Unreachable {
        fn get_text(&self, url: &str) -> PortResult<String> {
            Err(format!("connection refused: {url}").into())
        }
    }

    #[test]
    fn records_failures_with_err_convention() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("web.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        {
            let web = RecordingWeb::new(Arc::new(Unreachable), Arc::clone(&recorder));
            assert!(web.get_text("https://bugs.webkit.org/rest/bug/1").is_err());
        }

        Arc::try_unwrap(recorder).unwrap().into_inner().unwrap().finish().unwrap();
        let cassette = Cassette::load(&cassette_path).unwrap();
        let only = &cassette.interactions[0];
        assert_eq!(only.input["url"], "https://bugs.webkit.org/rest/bug/1");
        assert_eq!(only.output["Err"], "connection refused: https://bugs.webkit.org/rest/bug/1");
    }
}
