//! Secure action errors

use careportal_domain::{ApiError, DomainError};
use thiserror::Error;

/// Errors surfaced by the secure action coordinator.
///
/// Each variant leaves the coordinator in a defined phase; see the variant
/// docs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecureActionError {
    /// The code is not six digits. No request was sent; phase unchanged.
    #[error(transparent)]
    InvalidCode(DomainError),

    /// The requested operation cannot be addressed, for example a delete
    /// whose record id is not a single path segment. No request was sent;
    /// phase unchanged.
    #[error(transparent)]
    InvalidAction(DomainError),

    /// There is nothing to verify, resend, or execute. Phase is Idle.
    #[error("No pending action")]
    NoPendingAction,

    /// A different action is already awaiting verification. Phase unchanged.
    #[error("Another action is awaiting verification: {label}")]
    Busy {
        /// Label of the action already pending.
        label: String,
    },

    /// The server refused to dispatch an OTP. Phase is Idle and the request
    /// was discarded.
    #[error(transparent)]
    Dispatch(ApiError),

    /// The server rejected the code. Phase stays AwaitingOtp.
    #[error(transparent)]
    Verification(ApiError),

    /// Re-dispatching the OTP failed. Phase stays AwaitingOtp.
    #[error(transparent)]
    Resend(ApiError),

    /// The code was accepted but the deferred operation failed. Phase is
    /// Idle; the operation is not retried.
    #[error("{source}")]
    Execution {
        /// Label of the action that failed.
        label: String,
        /// The underlying failure.
        source: ApiError,
    },
}

impl SecureActionError {
    /// Returns the underlying remote error, if any.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Dispatch(e) | Self::Verification(e) | Self::Resend(e) => Some(e),
            Self::Execution { source, .. } => Some(source),
            Self::InvalidCode(_)
            | Self::InvalidAction(_)
            | Self::NoPendingAction | Self::Busy { .. } => None,
        }
    }
}
