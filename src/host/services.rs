//! The environment capabilities the host lends to collaborators.

use std::sync::Arc;

use crate::adapters::live::executive::LiveExecutive;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::platform::LivePlatformInfo;
use crate::adapters::live::user::LiveUser;
use crate::ports::{Executive, FileSystem, PlatformInfo, User};

/// Narrow view of the host's environment ports.
///
/// Collaborators that need to run commands, touch files, talk to the user
/// or ask about the platform get one of these instead of the whole host.
#[derive(Clone)]
pub struct HostServices {
    /// Process runner.
    pub executive: Arc<dyn Executive>,
    /// File access.
    pub filesystem: Arc<dyn FileSystem>,
    /// Interactive user I/O.
    pub user: Arc<dyn User>,
    /// Operating-system facts.
    pub platform: Arc<dyn PlatformInfo>,
}

impl HostServices {
    /// Bundles the four environment ports.
    #[must_use]
    pub fn new(
        executive: Arc<dyn Executive>,
        filesystem: Arc<dyn FileSystem>,
        user: Arc<dyn User>,
        platform: Arc<dyn PlatformInfo>,
    ) -> Self {
        Self { executive, filesystem, user, platform }
    }

    /// The real machine's ports, unrecorded.
    #[must_use]
    pub fn live() -> Self {
        let executive: Arc<dyn Executive> = Arc::new(LiveExecutive);
        let platform = Arc::new(LivePlatformInfo::new(Arc::clone(&executive)));
        Self::new(executive, Arc::new(LiveFileSystem), Arc::new(LiveUser), platform)
    }

    #[cfg(test)]
    pub(crate) fn for_testing(filesystem: Arc<dyn FileSystem>, executive: Arc<dyn Executive>) -> Self {
        Self::new(
            executive,
            filesystem,
            Arc::new(testing::StubUser),
            Arc::new(testing::FixedPlatform("linux")),
        )
    }
}
