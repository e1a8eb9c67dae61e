//! Error types for the host and its collaborators.

use std::path::PathBuf;

/// Errors surfaced by [`crate::host::Host`].
///
/// Every collaborator failure propagates unchanged through one of these
/// variants; the host never retries or masks.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Source-control detection or a query failed.
    #[error("Source control error: {0}")]
    Scm(#[from] ScmError),

    /// The watch list could not be loaded.
    #[error("Watch list error: {0}")]
    WatchList(#[from] WatchListError),

    /// Connecting to or leaving IRC failed.
    #[error("IRC error: {0}")]
    Irc(#[from] IrcError),

    /// A service client could not be built.
    #[error("Network error: {0}")]
    Net(#[from] NetError),

    /// A replay cassette could not be read or parsed.
    #[error("Cassette error: {0}")]
    Cassette(String),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be used.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Environment variable name.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The `.env` file exists but is malformed.
    #[error("Failed to load .env: {0}")]
    DotEnv(String),
}

/// Source-control detection and query errors.
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    /// No ancestor of the directory holds a working copy.
    #[error("No source control checkout found at or above {}", .0.display())]
    NotFound(PathBuf),

    /// The current directory could not be read.
    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(String),

    /// A `git` or `svn` invocation failed.
    #[error("{system} command failed: {message}")]
    Command {
        /// `"git"` or `"svn"`.
        system: &'static str,
        /// Runner error or the command's stderr.
        message: String,
    },
}

/// Watch-list loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum WatchListError {
    /// The file could not be read.
    #[error("Failed to read watch list {}: {message}", path.display())]
    Read {
        /// Watch-list path.
        path: PathBuf,
        /// Filesystem error text.
        message: String,
    },

    /// The file is not valid watch-list YAML.
    #[error("Failed to parse watch list: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A rule names a definition that does not exist.
    #[error("Rule in {section} refers to undefined definition {name:?}")]
    UndefinedDefinition {
        /// `"cc_rules"` or `"message_rules"`.
        section: &'static str,
        /// The missing definition.
        name: String,
    },

    /// A definition has neither a filename nor a content pattern.
    #[error("Definition {0:?} has no conditions")]
    EmptyDefinition(String),

    /// A pattern is not a valid regular expression.
    #[error("Invalid {field} pattern in definition {name:?}: {source}")]
    InvalidPattern {
        /// Definition holding the pattern.
        name: String,
        /// Which condition the pattern belongs to.
        field: &'static str,
        /// The regex compiler's error.
        #[source]
        source: regex::Error,
    },
}

/// IRC connection errors.
#[derive(Debug, thiserror::Error)]
pub enum IrcError {
    /// The server could not be reached or registration failed.
    #[error("Failed to connect: {0}")]
    Connect(String),

    /// Sending `QUIT` or closing the socket failed.
    #[error("Failed to disconnect cleanly: {0}")]
    Disconnect(String),

    /// An operation needed a connection and there was none.
    #[error("Not connected")]
    NotConnected,

    /// Posting or pumping failed on an open connection.
    #[error("Failed to send: {0}")]
    Send(String),
}

/// Layout-test port selection errors.
#[derive(Debug, thiserror::Error)]
pub enum PortFactoryError {
    /// No port is registered under the requested name.
    #[error("Unknown port {name:?}; known ports: {known}")]
    UnknownPort {
        /// Requested name.
        name: String,
        /// Comma-separated registered names.
        known: String,
    },
}

/// Errors from the HTTP-backed service clients.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// The HTTP request failed.
    #[error("Request to {url} failed: {message}")]
    Request {
        /// Requested URL.
        url: String,
        /// Transport or status error.
        message: String,
    },

    /// The response body was not in the expected shape.
    #[error("Unexpected response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder error.
        message: String,
    },

    /// The tracker has no bug with this id.
    #[error("Bug {0} not found")]
    BugNotFound(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_errors_name_their_source() {
        let scm: HostError = ScmError::NotFound(PathBuf::from("/tmp")).into();
        assert_eq!(scm.to_string(), "Source control error: No source control checkout found at or above /tmp");

        let cassette = HostError::Cassette("Failed to read cassette file /x: gone".into());
        assert_eq!(cassette.to_string(), "Cassette error: Failed to read cassette file /x: gone");
    }

    #[test]
    fn invalid_pattern_keeps_the_regex_error_as_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = WatchListError::InvalidPattern { name: "Loader".into(), field: "filename", source };
        assert!(err.to_string().starts_with("Invalid filename pattern in definition \"Loader\""));
        assert!(std::error::Error::source(&err).is_some());
    }
}
