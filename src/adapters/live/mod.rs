//! Live adapters for real external interactions.

pub mod executive;
pub mod filesystem;
pub mod irc;
pub mod platform;
pub mod user;
pub mod web;
