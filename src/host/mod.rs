//! The host: one context object that owns every environment and service
//! handle a command needs.
//!
//! Cheap, side-effect-free collaborators are built when the host is
//! created. Source control, the Chromium build bot, the watch list and IRC
//! are created later: the first two on an explicit call, the memoized ones
//! on first access, and IRC only through [`Host::ensure_irc_connected`].

pub mod factory;
pub mod services;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use factory::{CollaboratorFactory, LiveFactory};
pub use services::HostServices;

use crate::adapters::live::executive::LiveExecutive;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::platform::LivePlatformInfo;
use crate::adapters::live::user::LiveUser;
use crate::adapters::live::web::LiveWeb;
use crate::adapters::recording::{RecordingExecutive, RecordingWeb};
use crate::adapters::replaying::{ReplayingExecutive, ReplayingWeb};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::checkout::{Checkout, Scm};
use crate::config::HostConfig;
use crate::error::{HostError, IrcError};
use crate::layout_tests::{Port, PortFactory};
use crate::net::{BuildBot, Bugzilla, ChromiumBuildBot, StatusServer};
use crate::ports::{Executive, FileSystem, IrcConnection, IrcDelegate, PlatformInfo, User, Web};
use crate::watchlist::WatchList;
use crate::workspace::Workspace;

/// The environment ports and configuration a host is assembled from.
pub struct HostParts {
    /// Process runner.
    pub executive: Arc<dyn Executive>,
    /// File access.
    pub filesystem: Arc<dyn FileSystem>,
    /// Interactive user I/O.
    pub user: Arc<dyn User>,
    /// Operating-system facts.
    pub platform: Arc<dyn PlatformInfo>,
    /// HTTP access for the service clients.
    pub web: Arc<dyn Web>,
    /// Service URLs.
    pub config: HostConfig,
    /// Builds the lazily created collaborators.
    pub factory: Box<dyn CollaboratorFactory>,
}

/// Holds long-lived handles to environment and service abstractions.
///
/// `Host` is `Send` but not `Sync`: lazy fields use [`OnceCell`], so
/// sharing one host between threads needs external synchronisation.
pub struct Host {
    /// Process runner.
    pub executive: Arc<dyn Executive>,
    /// File access.
    pub filesystem: Arc<dyn FileSystem>,
    /// Interactive user I/O.
    pub user: Arc<dyn User>,
    /// Operating-system facts.
    pub platform: Arc<dyn PlatformInfo>,
    /// Scratch-file and archive helpers.
    pub workspace: Workspace,
    /// HTTP access.
    pub web: Arc<dyn Web>,
    /// Bug tracker client.
    pub bugs: Bugzilla,
    /// WebKit build master client.
    pub buildbot: BuildBot,
    /// Commit-queue status client.
    pub status_server: StatusServer,
    /// Layout-test port construction.
    pub port_factory: PortFactory,
    factory: Box<dyn CollaboratorFactory>,
    checkout: Option<Checkout>,
    port: Option<Port>,
    irc: Option<Box<dyn IrcConnection>>,
    chromium_buildbot: OnceCell<Arc<ChromiumBuildBot>>,
    watch_list: OnceCell<Arc<WatchList>>,
}

impl Host {
    /// Assembles a host from `parts`.
    ///
    /// Only constructs in-memory clients; nothing here touches the disk,
    /// the network or a child process.
    #[must_use]
    pub fn new(parts: HostParts) -> Self {
        let HostParts { executive, filesystem, user, platform, web, config, factory } = parts;

        let workspace = Workspace::new(Arc::clone(&filesystem), Arc::clone(&executive));
        let bugs = Bugzilla::new(config.bugzilla_url, Arc::clone(&web));
        let buildbot = BuildBot::new(config.buildbot_url, Arc::clone(&web));
        let status_server = StatusServer::new(config.status_server_url, Arc::clone(&web));
        let port_factory = PortFactory::new(HostServices::new(
            Arc::clone(&executive),
            Arc::clone(&filesystem),
            Arc::clone(&user),
            Arc::clone(&platform),
        ));
        tracing::debug!("host constructed");

        Self {
            executive,
            filesystem,
            user,
            platform,
            workspace,
            web,
            bugs,
            buildbot,
            status_server,
            port_factory,
            factory,
            checkout: None,
            port: None,
            irc: None,
            chromium_buildbot: OnceCell::new(),
            watch_list: OnceCell::new(),
        }
    }

    /// A host backed by the real machine.
    #[must_use]
    pub fn live(config: HostConfig) -> Self {
        let executive: Arc<dyn Executive> = Arc::new(LiveExecutive);
        let web: Arc<dyn Web> = Arc::new(LiveWeb::new(config.irc.timeout));
        Self::with_ports(config, executive, web)
    }

    /// A live host whose executive and web traffic is captured by `session`.
    #[must_use]
    pub fn recording(config: HostConfig, session: &RecordingSession) -> Self {
        let executive: Arc<dyn Executive> =
            Arc::new(RecordingExecutive::new(Arc::new(LiveExecutive), Arc::clone(&session.executive)));
        let web: Arc<dyn Web> = Arc::new(RecordingWeb::new(
            Arc::new(LiveWeb::new(config.irc.timeout)),
            Arc::clone(&session.web),
        ));
        Self::with_ports(config, executive, web)
    }

    /// A host whose executive and web traffic is served from a cassette.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Cassette`] if the cassette cannot be read or parsed.
    pub fn replaying(config: HostConfig, cassette_path: &Path) -> Result<Self, HostError> {
        let cassette = Cassette::load(cassette_path).map_err(HostError::Cassette)?;
        tracing::info!(cassette = %cassette_path.display(), ports = ?cassette.ports(), "replaying cassette");
        let executive: Arc<dyn Executive> = Arc::new(ReplayingExecutive::new(CassetteReplayer::new(&cassette)));
        let web: Arc<dyn Web> = Arc::new(ReplayingWeb::new(CassetteReplayer::new(&cassette)));
        Ok(Self::with_ports(config, executive, web))
    }

    fn with_ports(config: HostConfig, executive: Arc<dyn Executive>, web: Arc<dyn Web>) -> Self {
        let platform = Arc::new(LivePlatformInfo::new(Arc::clone(&executive)));
        Self::new(HostParts {
            executive,
            filesystem: Arc::new(LiveFileSystem),
            user: Arc::new(LiveUser),
            platform,
            web,
            factory: Box::new(LiveFactory::new(config.clone())),
            config,
        })
    }

    /// The environment ports, bundled for collaborators.
    #[must_use]
    pub fn services(&self) -> HostServices {
        HostServices::new(
            Arc::clone(&self.executive),
            Arc::clone(&self.filesystem),
            Arc::clone(&self.user),
            Arc::clone(&self.platform),
        )
    }

    /// Detects source control and sets both [`Host::scm`] and
    /// [`Host::checkout`], replacing any earlier values.
    ///
    /// # Errors
    ///
    /// Returns an error when detection fails; the previous values are kept.
    pub fn initialize_scm(&mut self, patch_directories: Option<&[PathBuf]>) -> Result<(), HostError> {
        let scm = self.factory.resolve_scm(&self.services(), patch_directories)?;
        tracing::info!(scm = scm.name(), root = %scm.checkout_root().display(), "source control initialized");
        self.checkout = Some(Checkout::new(scm));
        Ok(())
    }

    /// The active source-control backend, if initialized.
    #[must_use]
    pub fn scm(&self) -> Option<Arc<dyn Scm>> {
        self.checkout.as_ref().map(|checkout| Arc::clone(checkout.scm()))
    }

    /// The checkout wrapping [`Host::scm`], if initialized.
    #[must_use]
    pub fn checkout(&self) -> Option<&Checkout> {
        self.checkout.as_ref()
    }

    /// The port chosen by the caller, if any. Never built here.
    #[must_use]
    pub fn port(&self) -> Option<&Port> {
        self.port.as_ref()
    }

    /// Sets the port returned by [`Host::port`].
    pub fn set_port(&mut self, port: Port) {
        tracing::debug!(port = port.name(), "port set");
        self.port = Some(port);
    }

    /// The Chromium build-bot client, created on first call.
    ///
    /// # Errors
    ///
    /// Propagates construction failures. Nothing is cached on failure.
    pub fn chromium_buildbot(&self) -> Result<Arc<ChromiumBuildBot>, HostError> {
        if let Some(bot) = self.chromium_buildbot.get() {
            return Ok(Arc::clone(bot));
        }
        let bot = Arc::new(self.factory.chromium_buildbot(&self.web)?);
        tracing::debug!(url = bot.buildbot().base_url(), "chromium build bot created");
        Ok(Arc::clone(self.chromium_buildbot.get_or_init(|| bot)))
    }

    /// The parsed watch list, loaded on first call and cached after that
    /// even if the file later changes.
    ///
    /// # Errors
    ///
    /// Propagates read and parse failures. Nothing is cached on failure.
    pub fn watch_list(&self) -> Result<Arc<WatchList>, HostError> {
        if let Some(list) = self.watch_list.get() {
            return Ok(Arc::clone(list));
        }
        let list = Arc::new(self.factory.load_watch_list(&self.filesystem)?);
        tracing::debug!(definitions = list.definition_names().len(), "watch list cached");
        Ok(Arc::clone(self.watch_list.get_or_init(|| list)))
    }

    /// Connects to IRC with `delegate` unless a connection already exists.
    ///
    /// A second call is a no-op and its delegate is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection attempt fails.
    pub fn ensure_irc_connected(&mut self, delegate: Arc<dyn IrcDelegate>) -> Result<(), HostError> {
        if self.irc.is_some() {
            return Ok(());
        }
        let connection = self.factory.connect_irc(delegate)?;
        tracing::info!("IRC connected");
        self.irc = Some(connection);
        Ok(())
    }

    /// The IRC connection, if [`Host::ensure_irc_connected`] succeeded.
    #[must_use]
    pub fn irc(&self) -> Option<&dyn IrcConnection> {
        self.irc.as_deref()
    }

    /// Mutable access to the IRC connection, for posting and pumping.
    pub fn irc_mut(&mut self) -> Option<&mut dyn IrcConnection> {
        match &mut self.irc {
            Some(connection) => Some(connection.as_mut()),
            None => None,
        }
    }

    /// Ends a unit of work: disconnects and clears IRC if connected.
    ///
    /// # Errors
    ///
    /// Returns the disconnect error. The handle is cleared regardless.
    pub fn command_completed(&mut self) -> Result<(), HostError> {
        let Some(mut connection) = self.irc.take() else {
            return Ok(());
        };
        tracing::info!("disconnecting from IRC");
        connection.disconnect().map_err(|e| IrcError::Disconnect(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::error::{NetError, ScmError, WatchListError};
    use crate::net::testing::CannedWeb;
    use crate::ports::PortResult;
    use super::services::testing::{FixedPlatform, StubExecutive, StubUser};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Log(Mutex<Vec<&'static str>>);

    struct FakeFactory {
        log: Arc<Log>,
    }

    struct NoisyConnection {
        log: Arc<Log>,
        fail_disconnect: bool,
    }

    impl IrcConnection for NoisyConnection {
        fn post(&mut self, _message: &str) -> PortResult<()> {
            self.log.0.lock().unwrap().push("post");
            Ok(())
        }

        fn pump(&mut self) -> PortResult<usize> {
            Ok(0)
        }

        fn disconnect(&mut self) -> PortResult<()> {
            self.log.0.lock().unwrap().push("disconnect");
            if self.fail_disconnect {
                return Err("socket already closed".into());
            }
            Ok(())
        }
    }

    impl CollaboratorFactory for FakeFactory {
        fn resolve_scm(
            &self,
            services: &HostServices,
            patch_directories: Option<&[PathBuf]>,
        ) -> Result<Arc<dyn Scm>, ScmError> {
            self.log.0.lock().unwrap().push("scm");
            crate::checkout::default_scm(services, patch_directories)
        }

        fn chromium_buildbot(&self, web: &Arc<dyn Web>) -> Result<ChromiumBuildBot, NetError> {
            self.log.0.lock().unwrap().push("chromium");
            Ok(ChromiumBuildBot::new("https://chromium.example", Arc::clone(web)))
        }

        fn load_watch_list(&self, _filesystem: &Arc<dyn FileSystem>) -> Result<WatchList, WatchListError> {
            self.log.0.lock().unwrap().push("watchlist");
            WatchList::parse("definitions: {}\n")
        }

        fn connect_irc(&self, delegate: Arc<dyn IrcDelegate>) -> Result<Box<dyn IrcConnection>, IrcError> {
            self.log.0.lock().unwrap().push("connect");
            Ok(Box::new(NoisyConnection {
                log: Arc::clone(&self.log),
                fail_disconnect: delegate.irc_nickname() == "flaky",
            }))
        }
    }

    struct Nick(&'static str);

    impl IrcDelegate for Nick {
        fn irc_nickname(&self) -> String {
            self.0.to_string()
        }

        fn irc_message_received(&self, _nick: &str, _message: &str) {}
    }

    fn host(fs: MemoryFileSystem) -> (Host, Arc<Log>) {
        let log = Arc::new(Log::default());
        let host = Host::new(HostParts {
            executive: Arc::new(StubExecutive { cpus: 2 }),
            filesystem: Arc::new(fs),
            user: Arc::new(StubUser),
            platform: Arc::new(FixedPlatform("mac")),
            web: Arc::new(CannedWeb::default()),
            config: HostConfig::default(),
            factory: Box::new(FakeFactory { log: Arc::clone(&log) }),
        });
        (host, log)
    }

    fn calls(log: &Log) -> Vec<&'static str> {
        log.0.lock().unwrap().clone()
    }

    #[test]
    fn construction_builds_nothing_lazy() {
        let (host, log) = host(MemoryFileSystem::new("/"));
        assert!(host.scm().is_none());
        assert!(host.checkout().is_none());
        assert!(host.port().is_none());
        assert!(host.irc().is_none());
        assert!(calls(&log).is_empty());
        assert_eq!(host.bugs.bug_url_for_bug_id(7), "https://bugs.webkit.org/show_bug.cgi?id=7");
    }

    #[test]
    fn failed_scm_detection_keeps_fields_unset() {
        let (mut host, _log) = host(MemoryFileSystem::new("/nowhere"));
        let err = host.initialize_scm(None).unwrap_err();
        assert!(matches!(err, HostError::Scm(ScmError::NotFound(_))));
        assert!(host.scm().is_none());
        assert!(host.checkout().is_none());
    }

    #[test]
    fn reinitializing_scm_replaces_both_handles() {
        let (mut host, log) = host(MemoryFileSystem::new("/src/WebKit").with_dir("/src/WebKit/.git"));
        host.initialize_scm(None).unwrap();
        let first = host.scm().unwrap();
        host.initialize_scm(Some(&[PathBuf::from("Source")])).unwrap();
        let second = host.scm().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(host.checkout().unwrap().scm(), &second));
        assert_eq!(second.patch_directories(), [PathBuf::from("Source")]);
        assert_eq!(calls(&log), ["scm", "scm"]);
    }

    #[test]
    fn port_is_only_ever_set_from_outside() {
        let (mut host, _log) = host(MemoryFileSystem::new("/"));
        let _ = host.port_factory.get(None).unwrap();
        assert!(host.port().is_none());

        let port = host.port_factory.get(Some("qt")).unwrap();
        host.set_port(port);
        assert_eq!(host.port().map(Port::name), Some("qt"));
    }

    #[test]
    fn memoized_collaborators_are_built_once() {
        let (host, log) = host(MemoryFileSystem::new("/"));
        let a = host.chromium_buildbot().unwrap();
        let b = host.chromium_buildbot().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&host.watch_list().unwrap(), &host.watch_list().unwrap()));
        assert_eq!(calls(&log), ["chromium", "watchlist"]);
    }

    #[test]
    fn irc_lifecycle() {
        let (mut host, log) = host(MemoryFileSystem::new("/"));
        host.command_completed().unwrap();

        host.ensure_irc_connected(Arc::new(Nick("first"))).unwrap();
        host.ensure_irc_connected(Arc::new(Nick("second"))).unwrap();
        host.irc_mut().unwrap().post("hello").unwrap();
        host.command_completed().unwrap();

        assert!(host.irc().is_none());
        assert_eq!(calls(&log), ["connect", "post", "disconnect"]);
    }

    #[test]
    fn failed_disconnect_still_clears_handle() {
        let (mut host, _log) = host(MemoryFileSystem::new("/"));
        host.ensure_irc_connected(Arc::new(Nick("flaky"))).unwrap();
        let err = host.command_completed().unwrap_err();
        assert!(matches!(err, HostError::Irc(IrcError::Disconnect(_))));
        assert!(host.irc().is_none());
    }
}
