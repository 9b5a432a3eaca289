//! In-memory credential backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::ports::{CredentialBackend, CredentialError};

/// Credential backend that keeps values in memory only.
///
/// Clones share the same map, so a test can hand one clone to the store and
/// inspect "persisted" values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialBackend {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCredentialBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `entries`, as if left behind by
    /// an earlier process.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(values)),
        }
    }

    /// Returns the value currently stored under `key`.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl CredentialBackend for MemoryCredentialBackend {
    async fn load(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.peek(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CredentialError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
