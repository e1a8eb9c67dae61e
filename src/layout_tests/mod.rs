//! Layout-test infrastructure the host wires up.

pub mod port;

pub use port::{Port, PortFactory};
