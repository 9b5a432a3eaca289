//! Credential persistence port
//!
//! Defines the durable key-value storage behind the credential store.

use async_trait::async_trait;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Key under which the last-known role is persisted.
pub const ROLE_KEY: &str = "userRole";

/// Errors that can occur while persisting credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Durable string storage surviving process restarts.
///
/// Values written here are read back once, when the credential store is
/// constructed.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Loads the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    async fn load(&self, key: &str) -> Result<Option<String>, CredentialError>;

    /// Stores `value` under `key`, overwriting any prior value.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialError>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    async fn remove(&self, key: &str) -> Result<(), CredentialError>;
}
