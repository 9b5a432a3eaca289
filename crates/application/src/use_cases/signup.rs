//! Patient self-registration use case.

use std::sync::Arc;

use careportal_domain::{Credential, SignupForm, encode, endpoints};

use super::login::store_token;
use crate::auth::CredentialStore;
use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Registers a patient account and signs it in.
pub struct Signup<C: ApiClient> {
    client: Arc<C>,
    credentials: CredentialStore,
}

impl<C: ApiClient> Signup<C> {
    /// Creates a new `Signup` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, credentials: CredentialStore) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Validates the form, creates the account, and stores the credential.
    ///
    /// # Errors
    /// - Returns the first validation failure of the form
    /// - Returns the server's message if registration fails
    pub async fn execute(&self, form: SignupForm) -> ApplicationResult<Credential> {
        let request = form.into_request()?;
        let body = encode(&request)?;
        let response = self.client.post(endpoints::SIGNUP, Some(&body)).await?;
        store_token(&self.credentials, response).await
    }
}
