//! Replaying adapter for the `Web` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{PortResult, Web};

/// Answers HTTP fetches from a cassette.
pub struct ReplayingWeb {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingWeb {
    /// Creates a replaying web adapter from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Web for ReplayingWeb {
    fn get_text(&self, _url: &str) -> PortResult<String> {
        replay_result(&self.replayer, "web", "get_text")
    }
}
