//! JSON codec for the session document, shared by every backend that stores
//! the document as an opaque string (cookie value, SQLite text column).

use math_core::model::SessionState;
use tracing::debug;

use crate::repository::StorageError;

/// Serialize the document for storage.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the document cannot be encoded.
pub fn encode_state(state: &SessionState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse a stored document, degrading to the default document when the value
/// is corrupt. The failure is logged as a diagnostic but never surfaced.
#[must_use]
pub fn decode_state(raw: &str) -> SessionState {
    match serde_json::from_str(raw) {
        Ok(state) => state,
        Err(e) => {
            debug!(error = %e, "stored session document unparsable, using defaults");
            SessionState::default()
        }
    }
}
