//! IRC ports: the live connection, its delegate, and the connector that
//! opens it.

use std::sync::Arc;

use super::PortResult;

/// Receives events from an IRC connection and supplies identity.
pub trait IrcDelegate: Send + Sync {
    /// Nickname to register with.
    fn irc_nickname(&self) -> String;

    /// Server password, if the network requires one.
    fn irc_password(&self) -> Option<String> {
        None
    }

    /// Called for every channel or private message received.
    fn irc_message_received(&self, nick: &str, message: &str);
}

/// A registered, joined IRC session.
pub trait IrcConnection: Send {
    /// Sends a message to the joined channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket write fails or the session is closed.
    fn post(&mut self, message: &str) -> PortResult<()>;

    /// Reads whatever the server has sent, answering pings and handing
    /// messages to the delegate. Returns the number of messages delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket read fails.
    fn pump(&mut self) -> PortResult<usize>;

    /// Leaves the network and closes the socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the goodbye could not be sent.
    fn disconnect(&mut self) -> PortResult<()>;
}

/// Opens IRC connections. Connecting is a network side effect.
pub trait IrcConnector: Send + Sync {
    /// Connects, registers, and joins, binding the session to `delegate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or registration fails.
    fn connect(&self, delegate: Arc<dyn IrcDelegate>) -> PortResult<Box<dyn IrcConnection>>;
}
