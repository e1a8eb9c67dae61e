//! Integration tests for the host facade's construction and caching rules.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use devhost::adapters::memory::MemoryFileSystem;
use devhost::checkout::Scm;
use devhost::config::HostConfig;
use devhost::error::{HostError, IrcError, NetError, ScmError, WatchListError};
use devhost::host::{CollaboratorFactory, Host, HostParts, HostServices, LiveFactory};
use devhost::net::ChromiumBuildBot;
use devhost::ports::{
    CommandOutput, Executive, FileSystem, IrcConnection, IrcConnector, IrcDelegate, PlatformInfo,
    PortResult, User, Web,
};
use devhost::watchlist::WatchList;

const WATCHLIST_PATH: &str = "/src/WebKit/Tools/Scripts/webkitpy/common/config/watchlist.yaml";

struct QuietExecutive;

impl Executive for QuietExecutive {
    fn run_command(&self, argv: &[&str], _cwd: Option<&Path>) -> PortResult<CommandOutput> {
        Err(format!("unexpected command: {}", argv.join(" ")).into())
    }

    fn cpu_count(&self) -> usize {
        8
    }
}

struct SilentUser;

impl User for SilentUser {
    fn prompt(&self, _message: &str) -> PortResult<String> {
        Ok(String::new())
    }
}

struct Linux;

impl PlatformInfo for Linux {
    fn os_name(&self) -> String {
        "linux".into()
    }

    fn os_version(&self) -> Option<String> {
        Some("6.1".into())
    }
}

struct OfflineWeb;

impl Web for OfflineWeb {
    fn get_text(&self, url: &str) -> PortResult<String> {
        Err(format!("offline: {url}").into())
    }
}

/// Records which delegate each connection was opened for.
#[derive(Clone, Default)]
struct FakeConnector {
    connections: Arc<Mutex<Vec<String>>>,
    disconnects: Arc<AtomicUsize>,
}

struct FakeConnection {
    disconnects: Arc<AtomicUsize>,
}

impl IrcConnector for FakeConnector {
    fn connect(&self, delegate: Arc<dyn IrcDelegate>) -> PortResult<Box<dyn IrcConnection>> {
        self.connections.lock().unwrap().push(delegate.irc_nickname());
        Ok(Box::new(FakeConnection { disconnects: Arc::clone(&self.disconnects) }))
    }
}

impl IrcConnection for FakeConnection {
    fn post(&mut self, _message: &str) -> PortResult<()> {
        Ok(())
    }

    fn pump(&mut self) -> PortResult<usize> {
        Ok(0)
    }

    fn disconnect(&mut self) -> PortResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Delegate(&'static str);

impl IrcDelegate for Delegate {
    fn irc_nickname(&self) -> String {
        self.0.to_string()
    }

    fn irc_message_received(&self, _nick: &str, _message: &str) {}
}

/// Counts constructor calls while delegating to the production wiring.
struct CountingFactory {
    inner: LiveFactory,
    chromium_builds: Arc<AtomicUsize>,
    watch_list_loads: Arc<AtomicUsize>,
}

impl CollaboratorFactory for CountingFactory {
    fn resolve_scm(
        &self,
        services: &HostServices,
        patch_directories: Option<&[PathBuf]>,
    ) -> Result<Arc<dyn Scm>, ScmError> {
        self.inner.resolve_scm(services, patch_directories)
    }

    fn chromium_buildbot(&self, web: &Arc<dyn Web>) -> Result<ChromiumBuildBot, NetError> {
        self.chromium_builds.fetch_add(1, Ordering::SeqCst);
        self.inner.chromium_buildbot(web)
    }

    fn load_watch_list(&self, filesystem: &Arc<dyn FileSystem>) -> Result<WatchList, WatchListError> {
        self.watch_list_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_watch_list(filesystem)
    }

    fn connect_irc(&self, delegate: Arc<dyn IrcDelegate>) -> Result<Box<dyn IrcConnection>, IrcError> {
        self.inner.connect_irc(delegate)
    }
}

struct Fixture {
    host: Host,
    irc: FakeConnector,
    chromium_builds: Arc<AtomicUsize>,
    watch_list_loads: Arc<AtomicUsize>,
}

fn fixture(filesystem: MemoryFileSystem) -> Fixture {
    let config = HostConfig { watchlist_path: PathBuf::from(WATCHLIST_PATH), ..HostConfig::default() };
    let irc = FakeConnector::default();
    let chromium_builds = Arc::new(AtomicUsize::new(0));
    let watch_list_loads = Arc::new(AtomicUsize::new(0));
    let factory = CountingFactory {
        inner: LiveFactory::with_connector(config.clone(), Box::new(irc.clone())),
        chromium_builds: Arc::clone(&chromium_builds),
        watch_list_loads: Arc::clone(&watch_list_loads),
    };
    let host = Host::new(HostParts {
        executive: Arc::new(QuietExecutive),
        filesystem: Arc::new(filesystem),
        user: Arc::new(SilentUser),
        platform: Arc::new(Linux),
        web: Arc::new(OfflineWeb),
        config,
        factory: Box::new(factory),
    });
    Fixture { host, irc, chromium_builds, watch_list_loads }
}

fn webkit_checkout() -> MemoryFileSystem {
    MemoryFileSystem::new("/src/WebKit/Tools/Scripts")
        .with_dir("/src/WebKit/.git")
        .with_file(WATCHLIST_PATH, "definitions:\n  Loader:\n    filename: Source/WebCore/loader/\n")
}

#[test]
fn fresh_host_has_no_lazy_handles() {
    let f = fixture(webkit_checkout());
    assert!(f.host.scm().is_none());
    assert!(f.host.checkout().is_none());
    assert!(f.host.port().is_none());
    assert!(f.host.irc().is_none());
    assert_eq!(f.chromium_builds.load(Ordering::SeqCst), 0);
    assert_eq!(f.watch_list_loads.load(Ordering::SeqCst), 0);
    assert!(f.irc.connections.lock().unwrap().is_empty());
}

#[test]
fn eager_collaborators_are_ready_after_construction() {
    let f = fixture(webkit_checkout());
    assert_eq!(f.host.buildbot.base_url(), "https://build.webkit.org");
    assert_eq!(f.host.port_factory.get(None).unwrap().default_child_processes(), 8);
    assert_eq!(
        f.host.workspace.find_unused_filename(Path::new("/out"), "patch", "diff", 5),
        Some(PathBuf::from("/out/patch.diff"))
    );
    assert!(f.host.status_server.patch_status("commit-queue", 1).is_err());
}

#[test]
fn initialize_scm_sets_scm_and_checkout_together() {
    let mut f = fixture(webkit_checkout());
    f.host.initialize_scm(Some(&[PathBuf::from("/a")])).unwrap();

    let scm = f.host.scm().expect("scm after initialize_scm");
    let checkout = f.host.checkout().expect("checkout after initialize_scm");
    assert!(Arc::ptr_eq(checkout.scm(), &scm));
    assert_eq!(scm.name(), "git");
    assert_eq!(scm.checkout_root(), Path::new("/src/WebKit"));
    assert_eq!(scm.patch_directories(), [PathBuf::from("/a")]);
}

#[test]
fn initialize_scm_outside_a_checkout_propagates_and_leaves_fields_unset() {
    let mut f = fixture(MemoryFileSystem::new("/home/user"));
    let err = f.host.initialize_scm(None).unwrap_err();
    assert!(matches!(err, HostError::Scm(ScmError::NotFound(ref p)) if p == Path::new("/home/user")));
    assert!(f.host.scm().is_none());
    assert!(f.host.checkout().is_none());
}

#[test]
fn chromium_buildbot_is_built_once_and_shared() {
    let f = fixture(webkit_checkout());
    let first = f.host.chromium_buildbot().unwrap();
    let second = f.host.chromium_buildbot().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(f.chromium_builds.load(Ordering::SeqCst), 1);
}

#[test]
fn watch_list_is_cached_even_after_the_file_changes() {
    let f = fixture(webkit_checkout());
    let first = f.host.watch_list().unwrap();

    f.host
        .filesystem
        .write(
            Path::new(WATCHLIST_PATH),
            "definitions:\n  Bindings:\n    filename: Source/WebCore/bindings/\n",
        )
        .unwrap();
    let second = f.host.watch_list().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.definition_names(), ["Loader"]);
    assert_eq!(f.watch_list_loads.load(Ordering::SeqCst), 1);
}

#[test]
fn watch_list_errors_propagate_and_are_not_cached() {
    let fs = MemoryFileSystem::new("/src").with_file(WATCHLIST_PATH, "cc_rules:\n  Missing: [a@example.org]\n");
    let f = fixture(fs);
    for _ in 0..2 {
        let err = f.host.watch_list().unwrap_err();
        assert!(matches!(err, HostError::WatchList(WatchListError::UndefinedDefinition { .. })));
    }
    assert_eq!(f.watch_list_loads.load(Ordering::SeqCst), 2);
}

#[test]
fn ensure_irc_connected_connects_only_once() {
    let mut f = fixture(webkit_checkout());
    f.host.ensure_irc_connected(Arc::new(Delegate("first"))).unwrap();
    f.host.ensure_irc_connected(Arc::new(Delegate("second"))).unwrap();

    assert!(f.host.irc().is_some());
    assert_eq!(*f.irc.connections.lock().unwrap(), ["first"]);
}

#[test]
fn command_completed_disconnects_and_clears_irc() {
    let mut f = fixture(webkit_checkout());
    f.host.ensure_irc_connected(Arc::new(Delegate("sheriff"))).unwrap();
    f.host.command_completed().unwrap();

    assert!(f.host.irc().is_none());
    assert_eq!(f.irc.disconnects.load(Ordering::SeqCst), 1);

    // A later command can connect again.
    f.host.ensure_irc_connected(Arc::new(Delegate("sheriff"))).unwrap();
    assert_eq!(f.irc.connections.lock().unwrap().len(), 2);
}

#[test]
fn command_completed_without_connection_is_a_no_op() {
    let mut f = fixture(webkit_checkout());
    f.host.command_completed().unwrap();
    f.host.command_completed().unwrap();
    assert!(f.host.irc().is_none());
    assert_eq!(f.irc.disconnects.load(Ordering::SeqCst), 0);
}

#[test]
fn port_is_never_built_by_the_host() {
    let mut f = fixture(webkit_checkout());
    f.host.initialize_scm(None).unwrap();
    let _ = f.host.chromium_buildbot().unwrap();
    assert!(f.host.port().is_none());

    let port = f.host.port_factory.get(Some("chromium-mac")).unwrap();
    f.host.set_port(port);
    assert_eq!(f.host.port().map(|p| p.operating_system()), Some("mac"));
}
