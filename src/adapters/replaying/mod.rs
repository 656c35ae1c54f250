//! Replaying adapters that serve recorded tracker interactions.

pub mod credentials;
pub mod tickets;

pub use credentials::ReplayingCredentialProvider;
pub use tickets::ReplayingTicketSink;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

/// Takes the output of the next recorded `port::method` interaction.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, PortError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    let interaction = guard.next_interaction(port, method)?;
    Ok(interaction.output.clone())
}

/// Decodes a recorded `{"Ok": v}` / `{"Err": msg}` output.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, PortError> {
    match output {
        serde_json::Value::Object(mut map) => {
            if let Some(ok) = map.remove("Ok") {
                serde_json::from_value(ok)
                    .map_err(|e| -> PortError { format!("Malformed recorded output: {e}").into() })
            } else if let Some(err) = map.remove("Err") {
                let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
                Err(message.into())
            } else {
                Err("Recorded output is neither Ok nor Err".into())
            }
        }
        other => Err(format!("Recorded output is not an object: {other}").into()),
    }
}
