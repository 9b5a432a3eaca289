//! Application error types

use careportal_domain::{ApiError, DomainError};
use thiserror::Error;

use crate::ports::CredentialError;

/// Application-level errors.
///
/// Validation and remote failures display exactly the message the user
/// should see; callers never need to tell them apart to render them.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Input was rejected locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The credential could not be persisted.
    #[error("credential storage error: {0}")]
    Credential(#[from] CredentialError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
