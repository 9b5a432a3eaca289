//! Domain error types

use thiserror::Error;

/// Domain-level errors raised by local validation, before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The one-time passcode is not exactly six ASCII digits.
    #[error("Please enter a valid 6-digit OTP")]
    InvalidOtp,

    /// One or more required form fields are empty.
    #[error("Please fill in all required fields")]
    MissingFields {
        /// Names of the empty fields, in form order.
        fields: Vec<&'static str>,
    },

    /// The password is shorter than the minimum length.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// The password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The phone number is too short to be dialable.
    #[error("Please enter a valid phone number")]
    InvalidPhone,

    /// A free-text input was empty or whitespace only.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    /// A record id that cannot stand as one path segment.
    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_portal_wording() {
        assert_eq!(
            DomainError::InvalidOtp.to_string(),
            "Please enter a valid 6-digit OTP"
        );
        assert_eq!(
            DomainError::PasswordTooShort { min: 8 }.to_string(),
            "Password must be at least 8 characters"
        );
        assert_eq!(
            DomainError::EmptyInput("question").to_string(),
            "question must not be empty"
        );
    }
}
