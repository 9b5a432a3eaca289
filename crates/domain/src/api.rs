//! Uniform result shape for every remote call.
//!
//! Every network operation resolves to exactly one of `Ok(data)` or
//! `Err(ApiError)`. The error keeps a single displayable message, which is
//! what dashboards show, plus a kind tag so callers that care can tell
//! transport faults (plausibly retryable) from application rejections.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::DomainError;

/// Fallback message for a failed JSON call whose body carried no message.
pub const REQUEST_FAILED: &str = "Request failed";

/// Fallback message for a failed upload whose body carried no message.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Fallback message for a transport fault with no description.
pub const NETWORK_ERROR: &str = "Network error";

/// Result of a remote call.
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP methods used by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl ApiMethod {
    /// Returns the method as an uppercase string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an [`ApiError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The request never produced a response (DNS, refused, reset, timeout).
    Transport,
    /// The server answered with a non-success status.
    Application {
        /// HTTP status code.
        status: u16,
    },
    /// A success response whose body did not match the expected shape.
    Decode,
    /// Rejected locally before any network call.
    Validation,
}

impl ApiErrorKind {
    /// Returns true if repeating the same call could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transport)
    }
}

/// Error branch of [`ApiResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// Message shown to the user, verbatim from the server when available.
    pub message: String,
}

impl ApiError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: message.into(),
        }
    }

    /// Creates an application error for a non-success status.
    #[must_use]
    pub fn application(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Application { status },
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            message: message.into(),
        }
    }

    /// Returns the displayable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status for application errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Application { status } => Some(status),
            _ => None,
        }
    }

    /// Returns true if repeating the call could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::validation(error.to_string())
    }
}

/// Decodes a JSON value into a typed payload.
///
/// # Errors
///
/// Returns an [`ApiErrorKind::Decode`] error if the value does not match `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(format!("Invalid response: {e}")))
}

/// Encodes a request payload as a JSON value.
///
/// # Errors
///
/// Returns an [`ApiErrorKind::Validation`] error if the payload cannot be
/// represented as JSON.
pub fn encode<T: Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))
}

/// Extracts the server-supplied message from an error response body.
///
/// Looks at `detail` first (a string, or a list of `{msg}` entries as
/// produced by request validation), then `message`, then `error`. Returns
/// `fallback` when the body is empty, not JSON, or carries none of these.
#[must_use]
pub fn error_message_from_body(body: &[u8], fallback: &str) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return fallback.to_string();
    };

    if let Some(detail) = value.get("detail") {
        match detail {
            Value::String(s) if !s.is_empty() => return s.clone(),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }

    ["message", "error"]
        .iter()
        .find_map(|key| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map_or_else(|| fallback.to_string(), ToString::to_string)
}
