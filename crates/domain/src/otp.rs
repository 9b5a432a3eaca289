//! One-time passcode format.

use crate::error::{DomainError, DomainResult};

/// Number of digits in a portal OTP.
pub const OTP_LENGTH: usize = 6;

/// A syntactically valid one-time passcode: exactly six ASCII digits.
///
/// Whether the code is *correct* is only known to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpCode(String);

impl OtpCode {
    /// Parses a user-entered code.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidOtp`] unless the input is exactly six
    /// ASCII digits.
    pub fn parse(input: &str) -> DomainResult<Self> {
        if input.len() == OTP_LENGTH && input.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(input.to_string()))
        } else {
            Err(DomainError::InvalidOtp)
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
