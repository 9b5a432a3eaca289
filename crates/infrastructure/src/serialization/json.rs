//! Pretty JSON encoding shared by every file the client writes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Failure to encode or decode a persisted document.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// The value could not be encoded.
    #[error("Failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// The bytes are not valid JSON for the expected shape.
    #[error("Failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The document was written by a newer client.
    #[error("Unsupported schema version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Highest version this client reads.
        supported: u32,
    },
}

/// Encodes `value` with 2-space indentation and a trailing newline.
///
/// Maps keep their iteration order, so `BTreeMap` fields come out sorted.
///
/// # Errors
///
/// Returns [`SerializationError::Encode`] if `value` cannot be represented.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    value
        .serialize(&mut serializer)
        .map_err(SerializationError::Encode)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Decodes JSON bytes, pretty-printed or minified.
///
/// # Errors
///
/// Returns [`SerializationError::Decode`] on malformed or mismatched input.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Decode)
}
