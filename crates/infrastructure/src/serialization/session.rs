//! On-disk framing of the persisted session.
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "values": {
//!     "token": "eyJhbGciOi...",
//!     "userRole": "hospital_manager"
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::json::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Schema version written by this client.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct FrameRef<'a> {
    schema_version: u32,
    values: &'a BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct Frame {
    schema_version: u32,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// Persisted session values keyed by credential key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDocument {
    values: BTreeMap<String, String>,
}

impl SessionDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encodes the document at the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        to_json_stable_bytes(&FrameRef {
            schema_version: SESSION_SCHEMA_VERSION,
            values: &self.values,
        })
    }

    /// Decodes a document written by this or an older client.
    ///
    /// # Errors
    ///
    /// - [`SerializationError::Decode`] for malformed JSON
    /// - [`SerializationError::UnsupportedVersion`] for a newer schema
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let frame: Frame = from_json_bytes(bytes)?;
        if frame.schema_version > SESSION_SCHEMA_VERSION {
            return Err(SerializationError::UnsupportedVersion {
                found: frame.schema_version,
                supported: SESSION_SCHEMA_VERSION,
            });
        }
        Ok(Self {
            values: frame.values,
        })
    }
}
