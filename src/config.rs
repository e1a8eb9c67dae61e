//! Host configuration loaded from the environment.
//!
//! Values come from `DEVHOST_*` variables, with a `.env` file in the
//! working directory consulted first. Anything unset falls back to the
//! defaults below.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_BUGZILLA_URL: &str = "https://bugs.webkit.org";
const DEFAULT_BUILDBOT_URL: &str = "https://build.webkit.org";
const DEFAULT_CHROMIUM_BUILDBOT_URL: &str = "https://build.chromium.org/p/chromium.webkit";
const DEFAULT_STATUS_SERVER_URL: &str = "https://webkit-commit-queue.appspot.com";
const DEFAULT_IRC_SERVER: &str = "irc.freenode.net";
const DEFAULT_IRC_PORT: u16 = 6667;
const DEFAULT_IRC_CHANNEL: &str = "#webkit";
const DEFAULT_IRC_NICKNAME: &str = "devhost";
const DEFAULT_IRC_TIMEOUT_SECS: u64 = 10;
const DEFAULT_WATCHLIST: &str = ".devhost/watchlist.yaml";

/// IRC connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcConfig {
    /// Server host name.
    pub server: String,
    /// Server TCP port.
    pub port: u16,
    /// Channel to join and post to.
    pub channel: String,
    /// Nickname used by the command-line delegate.
    pub nickname: String,
    /// Optional server password.
    pub password: Option<String>,
    /// Connect, write, and HTTP timeout.
    pub timeout: Duration,
}

/// Everything a [`crate::host::Host`] needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Bugzilla base URL.
    pub bugzilla_url: String,
    /// WebKit build master base URL.
    pub buildbot_url: String,
    /// Chromium WebKit build master base URL.
    pub chromium_buildbot_url: String,
    /// Commit-queue status server base URL.
    pub status_server_url: String,
    /// IRC settings.
    pub irc: IrcConfig,
    /// Watch-list file, relative to the working directory unless absolute.
    pub watchlist_path: PathBuf,
    /// Directory to record cassettes into, if recording.
    pub record_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bugzilla_url: DEFAULT_BUGZILLA_URL.to_string(),
            buildbot_url: DEFAULT_BUILDBOT_URL.to_string(),
            chromium_buildbot_url: DEFAULT_CHROMIUM_BUILDBOT_URL.to_string(),
            status_server_url: DEFAULT_STATUS_SERVER_URL.to_string(),
            irc: IrcConfig {
                server: DEFAULT_IRC_SERVER.to_string(),
                port: DEFAULT_IRC_PORT,
                channel: DEFAULT_IRC_CHANNEL.to_string(),
                nickname: DEFAULT_IRC_NICKNAME.to_string(),
                password: None,
                timeout: Duration::from_secs(DEFAULT_IRC_TIMEOUT_SECS),
            },
            watchlist_path: PathBuf::from(DEFAULT_WATCHLIST),
            record_dir: None,
        }
    }
}

impl HostConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or `.env` is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::DotEnv(e.to_string())),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string = |key: &str, default: String| lookup(key).filter(|v| !v.is_empty()).unwrap_or(default);

        let port = parse_var(&lookup, "DEVHOST_IRC_PORT", defaults.irc.port)?;
        let timeout_secs = parse_var(&lookup, "DEVHOST_IRC_TIMEOUT_SECS", DEFAULT_IRC_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DEVHOST_IRC_TIMEOUT_SECS".into(),
                message: "must be at least 1".into(),
            });
        }

        Ok(Self {
            bugzilla_url: string("DEVHOST_BUGZILLA_URL", defaults.bugzilla_url),
            buildbot_url: string("DEVHOST_BUILDBOT_URL", defaults.buildbot_url),
            chromium_buildbot_url: string("DEVHOST_CHROMIUM_BUILDBOT_URL", defaults.chromium_buildbot_url),
            status_server_url: string("DEVHOST_STATUS_SERVER_URL", defaults.status_server_url),
            irc: IrcConfig {
                server: string("DEVHOST_IRC_SERVER", defaults.irc.server),
                port,
                channel: string("DEVHOST_IRC_CHANNEL", defaults.irc.channel),
                nickname: string("DEVHOST_IRC_NICKNAME", defaults.irc.nickname),
                password: lookup("DEVHOST_IRC_PASSWORD").filter(|v| !v.is_empty()),
                timeout: Duration::from_secs(timeout_secs),
            },
            watchlist_path: lookup("DEVHOST_WATCHLIST")
                .filter(|v| !v.is_empty())
                .map_or(defaults.watchlist_path, PathBuf::from),
            record_dir: lookup("DEVHOST_RECORD").filter(|v| !v.is_empty()).map(PathBuf::from),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}
