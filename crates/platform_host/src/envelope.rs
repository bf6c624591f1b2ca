//! Versioned wrapper for persisted state payloads.
//!
//! The window registry snapshot is stored inside a [`StateEnvelope`] so a
//! later schema change can be detected at load time and stale layouts dropped
//! instead of half-decoded.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Version of the envelope metadata itself.
pub const STATE_ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope around a serialized state payload.
pub struct StateEnvelope {
    /// Envelope metadata version.
    pub envelope_version: u32,
    /// Namespace identifying the owning subsystem.
    pub namespace: String,
    /// Owner-defined schema version for `payload`.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

/// Builds an envelope around a serializable payload, stamping it with a
/// monotonic update time.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<StateEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(StateEnvelope {
        envelope_version: STATE_ENVELOPE_VERSION,
        namespace: namespace.to_string(),
        schema_version,
        updated_at_unix_ms: crate::time::next_monotonic_ms(),
        payload,
    })
}

/// Decodes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when the payload does not match the target shape.
pub fn decode_envelope<T: DeserializeOwned>(envelope: &StateEnvelope) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}
