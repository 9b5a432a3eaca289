//! Email/password login use case.

use std::sync::Arc;

use careportal_domain::{Credential, LoginRequest, TokenResponse, decode, encode, endpoints};
use serde_json::Value;
use tracing::info;

use crate::auth::CredentialStore;
use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Signs in with email and password and stores the issued credential.
pub struct Login<C: ApiClient> {
    client: Arc<C>,
    credentials: CredentialStore,
}

impl<C: ApiClient> Login<C> {
    /// Creates a new `Login` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, credentials: CredentialStore) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Authenticates and stores the token and role.
    ///
    /// # Errors
    /// - Returns a validation error if either field is empty
    /// - Returns the server's message if authentication fails
    /// - Returns a credential error if the session cannot be persisted
    pub async fn execute(&self, request: LoginRequest) -> ApplicationResult<Credential> {
        request.validate()?;
        let body = encode(&request)?;
        let response = self.client.post(endpoints::LOGIN, Some(&body)).await?;
        store_token(&self.credentials, response).await
    }
}

/// Decodes a token response and makes it the current credential.
pub(super) async fn store_token(
    credentials: &CredentialStore,
    response: Value,
) -> ApplicationResult<Credential> {
    let token: TokenResponse = decode(response)?;
    let credential = token.into_credential();
    credentials.set_credential(credential.clone()).await?;
    info!(role = %credential.role, "signed in");
    Ok(credential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use crate::test_support::{Call, MockApiClient};
    use careportal_domain::{ApiError, ApiMethod, DomainError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_stores_token_and_role() {
        let client = Arc::new(MockApiClient::new());
        client.respond(
            ApiMethod::Post,
            endpoints::LOGIN,
            Ok(json!({"access_token": "tok-abc", "role": "hospital_manager"})),
        );
        let store = CredentialStore::in_memory();
        let login = Login::new(Arc::clone(&client), store.clone());

        let credential = login
            .execute(LoginRequest::new("m@h.org", "secret123"))
            .await
            .unwrap();

        assert_eq!(credential, Credential::new("tok-abc", "hospital_manager"));
        assert_eq!(store.get().await.as_deref(), Some("tok-abc"));
        assert_eq!(store.role().await.as_deref(), Some("hospital_manager"));
        assert_eq!(
            client.calls(),
            vec![Call::Json {
                method: ApiMethod::Post,
                path: endpoints::LOGIN.to_string(),
                body: Some(json!({"email": "m@h.org", "password": "secret123"})),
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_fields_rejected_without_request() {
        let client = Arc::new(MockApiClient::new());
        let login = Login::new(Arc::clone(&client), CredentialStore::in_memory());

        let err = login
            .execute(LoginRequest::new("m@h.org", ""))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Validation(DomainError::MissingFields { .. })
        ));
        assert_eq!(err.to_string(), "Please fill in all required fields");
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_store_untouched() {
        let client = Arc::new(MockApiClient::new());
        client.respond(
            ApiMethod::Post,
            endpoints::LOGIN,
            Err(ApiError::application(401, "Incorrect email or password")),
        );
        let store = CredentialStore::in_memory();
        let login = Login::new(Arc::clone(&client), store.clone());

        let err = login
            .execute(LoginRequest::new("m@h.org", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Incorrect email or password");
        assert_eq!(store.get().await, None);
    }

    #[tokio::test]
    async fn test_malformed_token_response_is_decode_error() {
        let client = Arc::new(MockApiClient::new());
        client.respond(ApiMethod::Post, endpoints::LOGIN, Ok(json!({"role": "admin"})));
        let store = CredentialStore::in_memory();
        let login = Login::new(Arc::clone(&client), store.clone());

        let err = login
            .execute(LoginRequest::new("a@h.org", "pw"))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Invalid response"));
        assert!(!store.is_authenticated().await);
    }
}
