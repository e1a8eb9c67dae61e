//! Replaying adapters that answer port calls from a cassette.

pub mod executive;
pub mod web;

pub use executive::ReplayingExecutive;
pub use web::ReplayingWeb;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortResult;

/// Fetch the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> PortResult<serde_json::Value> {
    let mut guard = replayer.lock().map_err(|_| "replayer lock poisoned")?;
    Ok(guard.next_interaction(port, method)?.output.clone())
}

/// Replay a recorded `Result`, using the `{"Ok": v}` / `{"Err": msg}`
/// convention written by `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> PortResult<T> {
    let output = next_output(replayer, port, method)?;
    if let Some(err) = output.get("Err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = output.get("Ok").unwrap_or(&output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{port}::{method}: failed to deserialize: {e}").into())
}
