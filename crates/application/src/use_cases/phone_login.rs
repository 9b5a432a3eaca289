//! Phone number + OTP login use case.

use std::sync::Arc;

use careportal_domain::{
    Credential, OtpCode, PhoneOtpRequest, PhoneOtpVerifyRequest, encode, endpoints,
};
use tracing::debug;

use super::login::store_token;
use crate::auth::CredentialStore;
use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Two-step login: send a code to a phone, then trade the code for a token.
pub struct PhoneLogin<C: ApiClient> {
    client: Arc<C>,
    credentials: CredentialStore,
}

impl<C: ApiClient> PhoneLogin<C> {
    /// Creates a new `PhoneLogin` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, credentials: CredentialStore) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Asks the server to text a login code to `phone`.
    ///
    /// Returns the normalized phone number to pass to [`Self::verify`].
    ///
    /// # Errors
    /// - Returns a validation error for numbers shorter than ten characters
    /// - Returns the server's message if the code could not be sent
    pub async fn send_code(&self, phone: &str) -> ApplicationResult<String> {
        let request = PhoneOtpRequest::new(phone)?;
        let body = encode(&request)?;
        self.client
            .post(endpoints::SEND_PHONE_OTP, Some(&body))
            .await?;
        debug!("login code sent");
        Ok(request.phone)
    }

    /// Verifies the code and stores the issued credential.
    ///
    /// # Errors
    /// - Returns a validation error unless `code` is six digits
    /// - Returns the server's message if the code is rejected
    pub async fn verify(&self, phone: &str, code: &str) -> ApplicationResult<Credential> {
        let code = OtpCode::parse(code)?;
        let body = encode(&PhoneOtpVerifyRequest::new(phone.trim(), &code))?;
        let response = self
            .client
            .post(endpoints::VERIFY_PHONE_OTP, Some(&body))
            .await?;
        store_token(&self.credentials, response).await
    }
}
