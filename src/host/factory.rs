//! Builders for the collaborators the host creates on demand.

use std::path::PathBuf;
use std::sync::Arc;

use super::HostServices;
use crate::adapters::live::irc::LiveIrcConnector;
use crate::checkout::{default_scm, Scm};
use crate::config::HostConfig;
use crate::error::{IrcError, NetError, ScmError, WatchListError};
use crate::net::ChromiumBuildBot;
use crate::ports::{FileSystem, IrcConnection, IrcConnector, IrcDelegate, Web};
use crate::watchlist::{WatchList, WatchListLoader};

/// Constructs the host's lazily built collaborators.
///
/// The host calls each method at most as often as its own caching rules
/// allow, so an implementation may count calls or hand out fakes.
pub trait CollaboratorFactory: Send {
    /// Detects the working copy.
    ///
    /// # Errors
    ///
    /// Returns an error when no supported source control is found.
    fn resolve_scm(
        &self,
        services: &HostServices,
        patch_directories: Option<&[PathBuf]>,
    ) -> Result<Arc<dyn Scm>, ScmError>;

    /// Creates the Chromium build-bot client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    fn chromium_buildbot(&self, web: &Arc<dyn Web>) -> Result<ChromiumBuildBot, NetError>;

    /// Reads and parses the watch list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    fn load_watch_list(&self, filesystem: &Arc<dyn FileSystem>) -> Result<WatchList, WatchListError>;

    /// Opens an IRC session bound to `delegate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    fn connect_irc(&self, delegate: Arc<dyn IrcDelegate>) -> Result<Box<dyn IrcConnection>, IrcError>;
}

/// Production wiring driven by [`HostConfig`].
pub struct LiveFactory {
    config: HostConfig,
    irc: Box<dyn IrcConnector>,
}

impl LiveFactory {
    /// Creates a factory using the live IRC connector from `config`.
    #[must_use]
    pub fn new(config: HostConfig) -> Self {
        let irc = LiveIrcConnector::new(
            config.irc.server.clone(),
            config.irc.port,
            config.irc.channel.clone(),
            config.irc.timeout,
        );
        Self::with_connector(config, Box::new(irc))
    }

    /// Creates a factory that opens IRC sessions through `irc`.
    #[must_use]
    pub fn with_connector(config: HostConfig, irc: Box<dyn IrcConnector>) -> Self {
        Self { config, irc }
    }
}

impl CollaboratorFactory for LiveFactory {
    fn resolve_scm(
        &self,
        services: &HostServices,
        patch_directories: Option<&[PathBuf]>,
    ) -> Result<Arc<dyn Scm>, ScmError> {
        default_scm(services, patch_directories)
    }

    fn chromium_buildbot(&self, web: &Arc<dyn Web>) -> Result<ChromiumBuildBot, NetError> {
        Ok(ChromiumBuildBot::new(self.config.chromium_buildbot_url.clone(), Arc::clone(web)))
    }

    fn load_watch_list(&self, filesystem: &Arc<dyn FileSystem>) -> Result<WatchList, WatchListError> {
        WatchListLoader::new(Arc::clone(filesystem), self.config.watchlist_path.clone()).load()
    }

    fn connect_irc(&self, delegate: Arc<dyn IrcDelegate>) -> Result<Box<dyn IrcConnection>, IrcError> {
        self.irc.connect(delegate).map_err(|e| IrcError::Connect(e.to_string()))
    }
}
