//! Logout use case.

use tracing::info;

use crate::auth::CredentialStore;
use crate::error::ApplicationResult;

/// Ends the session locally.
///
/// The server keeps no session state for bearer tokens, so nothing is sent.
pub struct Logout {
    credentials: CredentialStore,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub const fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }

    /// Clears the token and role from memory and durable storage.
    ///
    /// # Errors
    /// Returns a credential error if the persisted session cannot be removed;
    /// the in-memory session is cleared regardless.
    pub async fn execute(&self) -> ApplicationResult<()> {
        let was_signed_in = self.credentials.is_authenticated().await;
        self.credentials.clear().await?;
        if was_signed_in {
            info!("signed out");
        }
        Ok(())
    }
}
