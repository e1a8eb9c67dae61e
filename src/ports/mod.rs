//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the host and an external
//! system (processes, disk, the terminal, the OS, HTTP, IRC).
//! Implementations live in `src/adapters/`.

pub mod executive;
pub mod filesystem;
pub mod irc;
pub mod platform;
pub mod user;
pub mod web;

pub use executive::{CommandOutput, Executive};
pub use filesystem::FileSystem;
pub use irc::{IrcConnection, IrcConnector, IrcDelegate};
pub use platform::PlatformInfo;
pub use user::User;
pub use web::Web;

/// Result type shared by every port method that can fail.
pub type PortResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
