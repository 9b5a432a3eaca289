//! Process-wide bearer credential with durable persistence.
//!
//! The store reads its persisted values exactly once, at construction, and
//! afterwards changes only through explicit `set`/`clear` calls. Writes go
//! to memory first and then to the backend; last write wins.

use std::sync::Arc;

use careportal_domain::{Credential, token_preview};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::MemoryCredentialBackend;
use crate::ports::{CredentialBackend, CredentialError, ROLE_KEY, TOKEN_KEY};

#[derive(Debug, Default)]
struct Slot {
    token: Option<String>,
    role: Option<String>,
}

/// Thread-safe credential cell shared by the API client and use cases.
///
/// Cloning yields another handle to the same cell.
#[derive(Clone)]
pub struct CredentialStore {
    slot: Arc<RwLock<Slot>>,
    backend: Arc<dyn CredentialBackend>,
}

impl CredentialStore {
    /// Creates a store over `backend`, reading any persisted token and role.
    ///
    /// A backend that cannot be read is treated as empty; the failure is
    /// logged rather than surfaced so a damaged session file only costs a
    /// fresh login.
    pub async fn load(backend: Arc<dyn CredentialBackend>) -> Self {
        let token = Self::load_key(backend.as_ref(), TOKEN_KEY).await;
        let role = Self::load_key(backend.as_ref(), ROLE_KEY).await;

        match &token {
            Some(t) => debug!(token = %token_preview(t), role = ?role, "restored credential"),
            None => debug!("no persisted credential"),
        }

        Self {
            slot: Arc::new(RwLock::new(Slot { token, role })),
            backend,
        }
    }

    /// Creates an empty store that persists nowhere.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot::default())),
            backend: Arc::new(MemoryCredentialBackend::new()),
        }
    }

    async fn load_key(backend: &dyn CredentialBackend, key: &str) -> Option<String> {
        match backend.load(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted credential");
                None
            }
        }
    }

    /// Returns the current token, or `None` when signed out.
    pub async fn get(&self) -> Option<String> {
        self.slot.read().await.token.clone()
    }

    /// Returns the last-known role.
    pub async fn role(&self) -> Option<String> {
        self.slot.read().await.role.clone()
    }

    /// Returns token and role together when a token is present.
    ///
    /// A token persisted without a role reports an empty role.
    pub async fn credential(&self) -> Option<Credential> {
        let slot = self.slot.read().await;
        slot.token.as_ref().map(|token| {
            Credential::new(token.clone(), slot.role.clone().unwrap_or_default())
        })
    }

    /// Returns true if a token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.slot.read().await.token.is_some()
    }

    /// Replaces the token and persists it.
    ///
    /// # Errors
    /// Returns an error if persistence fails; the in-memory token is still
    /// replaced.
    pub async fn set(&self, token: impl Into<String>) -> Result<(), CredentialError> {
        let token = token.into();
        info!(token = %token_preview(&token), "credential set");
        self.slot.write().await.token = Some(token.clone());
        self.backend.save(TOKEN_KEY, &token).await
    }

    /// Replaces the role and persists it.
    ///
    /// # Errors
    /// Returns an error if persistence fails; the in-memory role is still
    /// replaced.
    pub async fn set_role(&self, role: impl Into<String>) -> Result<(), CredentialError> {
        let role = role.into();
        self.slot.write().await.role = Some(role.clone());
        self.backend.save(ROLE_KEY, &role).await
    }

    /// Replaces token and role together.
    ///
    /// # Errors
    /// Returns the first persistence failure.
    pub async fn set_credential(&self, credential: Credential) -> Result<(), CredentialError> {
        let Credential { token, role } = credential;
        self.set(token).await?;
        self.set_role(role).await
    }

    /// Removes token and role from memory and from the backend.
    ///
    /// # Errors
    /// Returns the first persistence failure; memory is cleared regardless.
    pub async fn clear(&self) -> Result<(), CredentialError> {
        {
            let mut slot = self.slot.write().await;
            slot.token = None;
            slot.role = None;
        }
        info!("credential cleared");
        self.backend.remove(TOKEN_KEY).await?;
        self.backend.remove(ROLE_KEY).await
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// Backend whose writes always fail.
    struct ReadOnlyBackend;

    #[async_trait]
    impl CredentialBackend for ReadOnlyBackend {
        async fn load(&self, _key: &str) -> Result<Option<String>, CredentialError> {
            Ok(None)
        }

        async fn save(&self, _key: &str, _value: &str) -> Result<(), CredentialError> {
            Err(CredentialError::Io(std::io::Error::other("read-only")))
        }

        async fn remove(&self, _key: &str) -> Result<(), CredentialError> {
            Err(CredentialError::Io(std::io::Error::other("read-only")))
        }
    }

    /// Backend whose reads always fail.
    struct UnreadableBackend;

    #[async_trait]
    impl CredentialBackend for UnreadableBackend {
        async fn load(&self, _key: &str) -> Result<Option<String>, CredentialError> {
            Err(CredentialError::Serialization("corrupt".to_string()))
        }

        async fn save(&self, _key: &str, _value: &str) -> Result<(), CredentialError> {
            Ok(())
        }

        async fn remove(&self, _key: &str) -> Result<(), CredentialError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_set_then_get_returns_token() {
        let store = CredentialStore::in_memory();
        for token in ["a", "eyJhbGciOiJIUzI1NiJ9.payload.sig", "tøken with spaces"] {
            store.set(token).await.unwrap();
            assert_eq!(store.get().await.as_deref(), Some(token));
        }
    }

    #[tokio::test]
    async fn test_clear_then_get_returns_none() {
        let store = CredentialStore::in_memory();
        store.set("abc").await.unwrap();
        store.set_role("doctor").await.unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.get().await, None);
        assert_eq!(store.role().await, None);
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_set_persists_to_backend() {
        let backend = MemoryCredentialBackend::new();
        let store = CredentialStore::load(Arc::new(backend.clone())).await;

        store
            .set_credential(Credential::new("tok-1", "hospital_manager"))
            .await
            .unwrap();

        assert_eq!(backend.peek(TOKEN_KEY).as_deref(), Some("tok-1"));
        assert_eq!(backend.peek(ROLE_KEY).as_deref(), Some("hospital_manager"));

        store.clear().await.unwrap();
        assert_eq!(backend.peek(TOKEN_KEY), None);
        assert_eq!(backend.peek(ROLE_KEY), None);
    }

    #[tokio::test]
    async fn test_load_restores_previous_session() {
        let backend =
            MemoryCredentialBackend::with_entries([(TOKEN_KEY, "persisted"), (ROLE_KEY, "admin")]);

        let store = CredentialStore::load(Arc::new(backend)).await;

        assert_eq!(
            store.credential().await,
            Some(Credential::new("persisted", "admin"))
        );
    }

    #[tokio::test]
    async fn test_load_reads_backend_once() {
        let backend = MemoryCredentialBackend::new();
        let store = CredentialStore::load(Arc::new(backend.clone())).await;

        // Written behind the store's back after construction.
        backend.save(TOKEN_KEY, "late").await.unwrap();

        assert_eq!(store.get().await, None);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = CredentialStore::in_memory();
        store.set("first").await.unwrap();
        store.set("second").await.unwrap();
        assert_eq!(store.get().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_persistence_failure_still_updates_memory() {
        let store = CredentialStore::load(Arc::new(ReadOnlyBackend)).await;

        let result = store.set("abc").await;

        assert!(matches!(result, Err(CredentialError::Io(_))));
        assert_eq!(store.get().await.as_deref(), Some("abc"));

        assert!(store.clear().await.is_err());
        assert_eq!(store.get().await, None);
    }

    #[tokio::test]
    async fn test_unreadable_backend_starts_empty() {
        let store = CredentialStore::load(Arc::new(UnreadableBackend)).await;
        assert_eq!(store.get().await, None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = CredentialStore::in_memory();
        let handle = store.clone();
        store.set("shared").await.unwrap();
        assert_eq!(handle.get().await.as_deref(), Some("shared"));
    }
}
