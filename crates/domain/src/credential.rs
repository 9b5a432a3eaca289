//! Bearer credential held for the current session.

use serde::{Deserialize, Serialize};

/// Role assumed when the server does not report one.
pub const DEFAULT_ROLE: &str = "patient";

/// An opaque bearer token and the role it was issued for.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The bearer token presented on every request.
    pub token: String,
    /// Role string as reported by the server (e.g. `hospital_manager`).
    pub role: String,
}

impl Credential {
    /// Creates a new credential.
    #[must_use]
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role: role.into(),
        }
    }

    /// Returns the dashboard route segment for the role
    /// (`hospital_manager` becomes `hospital-manager`).
    #[must_use]
    pub fn dashboard_slug(&self) -> String {
        self.role.replacen('_', "-", 1)
    }
}

// Tokens never appear in debug output.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &token_preview(&self.token))
            .field("role", &self.role)
            .finish()
    }
}

/// Returns a loggable preview of a token (first 8 chars + `...`).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let cut = token
            .char_indices()
            .nth(8)
            .map_or(token.len(), |(idx, _)| idx);
        format!("{}...", &token[..cut])
    } else {
        "***".to_string()
    }
}
