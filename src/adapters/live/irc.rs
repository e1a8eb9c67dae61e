//! Live IRC connector over a plain TCP socket.
//!
//! Speaks just enough of RFC 1459 to register, join one channel, post,
//! answer pings, and quit.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::irc::{IrcConnection, IrcConnector, IrcDelegate};
use crate::ports::PortResult;

const POLL_TIMEOUT: Duration = Duration::from_millis(50);
const QUIT_MESSAGE: &str = "devhost signing off";

/// Opens live IRC sessions against one server and channel.
#[derive(Debug, Clone)]
pub struct LiveIrcConnector {
    server: String,
    port: u16,
    channel: String,
    timeout: Duration,
}

impl LiveIrcConnector {
    /// Creates a connector for `server:port` that joins `channel`.
    #[must_use]
    pub fn new(
        server: impl Into<String>,
        port: u16,
        channel: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self { server: server.into(), port, channel: channel.into(), timeout }
    }
}

impl IrcConnector for LiveIrcConnector {
    fn connect(&self, delegate: Arc<dyn IrcDelegate>) -> PortResult<Box<dyn IrcConnection>> {
        let address = (self.server.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| format!("cannot resolve {}:{}: {e}", self.server, self.port))?
            .next()
            .ok_or_else(|| format!("{} resolved to no addresses", self.server))?;

        tracing::info!(server = %self.server, port = self.port, channel = %self.channel, "connecting to IRC");
        let stream = TcpStream::connect_timeout(&address, self.timeout)
            .map_err(|e| format!("cannot connect to {address}: {e}"))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let mut connection = LiveIrcConnection::new(stream, self.channel.clone(), delegate)?;
        connection.register()?;
        Ok(Box::new(connection))
    }
}

/// A live IRC session.
pub struct LiveIrcConnection {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
    pending: Vec<u8>,
    channel: String,
    delegate: Arc<dyn IrcDelegate>,
    closed: bool,
}

impl LiveIrcConnection {
    fn new(stream: TcpStream, channel: String, delegate: Arc<dyn IrcDelegate>) -> PortResult<Self> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self { writer: stream, reader, pending: Vec::new(), channel, delegate, closed: false })
    }

    fn register(&mut self) -> PortResult<()> {
        if let Some(password) = self.delegate.irc_password() {
            self.send(&format!("PASS {password}"))?;
        }
        let nick = self.delegate.irc_nickname();
        self.send(&format!("NICK {nick}"))?;
        self.send(&format!("USER {nick} 0 * :{nick}"))?;
        let join = format!("JOIN {}", self.channel);
        self.send(&join)
    }

    fn send(&mut self, line: &str) -> PortResult<()> {
        if self.closed {
            return Err("IRC connection already closed".into());
        }
        tracing::trace!(%line, "irc >>");
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\r\n")?;
        Ok(self.writer.flush()?)
    }

    fn handle_line(&mut self, line: &str) -> PortResult<bool> {
        tracing::trace!(%line, "irc <<");
        match parse_line(line) {
            Some(Inbound::Ping(token)) => {
                self.send(&format!("PONG :{token}"))?;
                Ok(false)
            }
            Some(Inbound::Privmsg { nick, text, .. }) => {
                self.delegate.irc_message_received(&nick, &text);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl IrcConnection for LiveIrcConnection {
    fn post(&mut self, message: &str) -> PortResult<()> {
        let line = format!("PRIVMSG {} :{message}", self.channel);
        self.send(&line)
    }

    fn pump(&mut self) -> PortResult<usize> {
        if self.closed {
            return Ok(0);
        }
        self.reader.get_ref().set_read_timeout(Some(POLL_TIMEOUT))?;
        let mut delivered = 0;
        loop {
            // Servers relay bytes in whatever encoding clients used.
            match self.reader.read_until(b'\n', &mut self.pending) {
                Ok(0) => {
                    self.closed = true;
                    break;
                }
                Ok(_) if self.pending.ends_with(b"\n") => {
                    let raw = std::mem::take(&mut self.pending);
                    let line = String::from_utf8_lossy(&raw);
                    if self.handle_line(line.trim_end_matches(['\r', '\n']))? {
                        delivered += 1;
                    }
                }
                Ok(_) => {}
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(delivered)
    }

    fn disconnect(&mut self) -> PortResult<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.send(&format!("QUIT :{QUIT_MESSAGE}"));
        self.closed = true;
        let _ = self.writer.shutdown(std::net::Shutdown::Both);
        tracing::info!("disconnected from IRC");
        result
    }
}

/// A server line the connection acts on.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Inbound {
    Ping(String),
    Privmsg { nick: String, target: String, text: String },
}

/// Parses one raw IRC line, ignoring commands the session does not handle.
pub(crate) fn parse_line(line: &str) -> Option<Inbound> {
    let (prefix, rest) = match line.strip_prefix(':') {
        Some(stripped) => {
            let (prefix, rest) = stripped.split_once(' ')?;
            (Some(prefix), rest)
        }
        None => (None, line),
    };
    let (command, params) = rest.split_once(' ').unwrap_or((rest, ""));
    match command {
        "PING" => Some(Inbound::Ping(params.trim_start_matches(':').to_string())),
        "PRIVMSG" => {
            let (target, text) = params.split_once(" :")?;
            let nick = prefix?.split('!').next()?.to_string();
            Some(Inbound::Privmsg { nick, target: target.to_string(), text: text.to_string() })
        }
        _ => None,
    }
}
