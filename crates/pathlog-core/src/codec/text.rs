//! Text encodings: a JSON document and a base64 armor of the binary form.

use super::binary;
use crate::error::{DecodeError, JournalError, JournalResult};
use crate::recorded::RecordedPath;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Serialize a journal as pretty-printed JSON.
///
/// JSON has no representation for NaN or infinity, so journals holding
/// non-finite values are rejected. Use [`to_base64`] for those.
pub fn to_json(recorded: &RecordedPath) -> JournalResult<String> {
    if let Some(index) = recorded.iter().position(|action| !action.is_finite()) {
        return Err(JournalError::NonFinite { index });
    }
    serde_json::to_string_pretty(recorded).map_err(|e| JournalError::Serialization(e.to_string()))
}

/// Deserialize a journal from JSON.
pub fn from_json(json: &str) -> JournalResult<RecordedPath> {
    serde_json::from_str(json).map_err(|e| DecodeError::Text(e.to_string()).into())
}

/// The binary encoding, base64 armored for string-only transports.
pub fn to_base64(recorded: &RecordedPath) -> String {
    STANDARD.encode(binary::encode(recorded))
}

/// Decode a base64 armored binary journal. Surrounding whitespace is ignored.
pub fn from_base64(text: &str) -> JournalResult<RecordedPath> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| DecodeError::Text(e.to_string()))?;
    Ok(binary::decode(&bytes)?)
}
