//! File-based credential backend.
//!
//! The session lives in a single JSON file (by default
//! `<data dir>/careportal/session.json`) framed by [`SessionDocument`].
//! Writes go to a sibling temporary file that is then renamed over the
//! original, so a crash never leaves a half-written session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use careportal_application::ports::{CredentialBackend, CredentialError, FileSystem};
use tokio::sync::Mutex;
use tracing::debug;

use crate::serialization::SessionDocument;

/// Credential backend persisting to a JSON file.
#[derive(Debug)]
pub struct FileCredentialBackend<F> {
    fs: F,
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl<F: FileSystem> FileCredentialBackend<F> {
    /// Creates a backend storing the session at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the session file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    async fn read_session(&self) -> Result<SessionDocument, CredentialError> {
        if !self.fs.exists(&self.path).await {
            return Ok(SessionDocument::new());
        }

        let content = self.fs.read_file(&self.path).await?;
        SessionDocument::from_bytes(&content)
            .map_err(|e| CredentialError::Serialization(e.to_string()))
    }

    async fn write_session(&self, session: &SessionDocument) -> Result<(), CredentialError> {
        let content = session
            .to_bytes()
            .map_err(|e| CredentialError::Serialization(e.to_string()))?;
        let temp = self.temp_path();
        self.fs.write_file(&temp, &content).await?;
        self.fs.rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}

#[async_trait]
impl<F: FileSystem> CredentialBackend for FileCredentialBackend<F> {
    async fn load(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.read_session().await?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let _guard = self.write_lock.lock().await;
        // A corrupt file is replaced rather than blocking every future login.
        let mut session = self.read_session().await.unwrap_or_default();
        session.insert(key, value);
        self.write_session(&session).await
    }

    async fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let _guard = self.write_lock.lock().await;
        let mut session = self.read_session().await.unwrap_or_default();
        if session.remove(key).is_none() && !self.fs.exists(&self.path).await {
            return Ok(());
        }

        if session.is_empty() {
            self.fs.remove_file(&self.path).await?;
            debug!(path = %self.path.display(), "session removed");
            Ok(())
        } else {
            self.write_session(&session).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::TokioFileSystem;
    use careportal_application::CredentialStore;
    use careportal_application::ports::{ROLE_KEY, TOKEN_KEY};
    use careportal_domain::Credential;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn backend(dir: &TempDir) -> FileCredentialBackend<TokioFileSystem> {
        FileCredentialBackend::new(TokioFileSystem::new(), dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(backend(&dir).load(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let backend = backend(&dir);

        backend.save(TOKEN_KEY, "tok-1").await.unwrap();
        backend.save(ROLE_KEY, "doctor").await.unwrap();
        backend.save(TOKEN_KEY, "tok-2").await.unwrap();

        assert_eq!(backend.load(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-2"));
        assert_eq!(backend.load(ROLE_KEY).await.unwrap().as_deref(), Some("doctor"));
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_layout_is_stable_json() {
        let dir = TempDir::new().unwrap();
        let backend = backend(&dir);
        backend.save(TOKEN_KEY, "abc").await.unwrap();
        backend.save(ROLE_KEY, "admin").await.unwrap();

        let written = std::fs::read_to_string(backend.path()).unwrap();

        assert_eq!(
            written,
            "{\n  \"schema_version\": 1,\n  \"values\": {\n    \"token\": \"abc\",\n    \"userRole\": \"admin\"\n  }\n}\n"
        );
    }

    #[tokio::test]
    async fn test_newer_session_file_is_not_read() {
        let dir = TempDir::new().unwrap();
        let backend = backend(&dir);
        std::fs::write(
            backend.path(),
            br#"{"schema_version": 9, "values": {"token": "from-the-future"}}"#,
        )
        .unwrap();

        let err = backend.load(TOKEN_KEY).await.unwrap_err();

        assert!(err.to_string().contains("Unsupported schema version 9"));
    }

    #[tokio::test]
    async fn test_removing_last_key_deletes_file() {
        let dir = TempDir::new().unwrap();
        let backend = backend(&dir);
        backend.save(TOKEN_KEY, "abc").await.unwrap();
        backend.save(ROLE_KEY, "admin").await.unwrap();

        backend.remove(TOKEN_KEY).await.unwrap();
        assert!(backend.path().exists());
        assert_eq!(backend.load(TOKEN_KEY).await.unwrap(), None);

        backend.remove(ROLE_KEY).await.unwrap();
        assert!(!backend.path().exists());

        backend.remove(ROLE_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_on_load_and_replaced_on_save() {
        let dir = TempDir::new().unwrap();
        let backend = backend(&dir);
        std::fs::write(backend.path(), b"{not json").unwrap();

        assert!(matches!(
            backend.load(TOKEN_KEY).await,
            Err(CredentialError::Serialization(_))
        ));

        backend.save(TOKEN_KEY, "fresh").await.unwrap();
        assert_eq!(backend.load(TOKEN_KEY).await.unwrap().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let dir = TempDir::new().unwrap();

        let first = CredentialStore::load(Arc::new(backend(&dir))).await;
        first
            .set_credential(Credential::new("persisted-token", "hospital_manager"))
            .await
            .unwrap();
        drop(first);

        let second = CredentialStore::load(Arc::new(backend(&dir))).await;
        assert_eq!(
            second.credential().await,
            Some(Credential::new("persisted-token", "hospital_manager"))
        );

        second.clear().await.unwrap();
        let third = CredentialStore::load(Arc::new(backend(&dir))).await;
        assert_eq!(third.get().await, None);
    }
}
