//! Application use cases (dashboard calls into the remote API).

mod admin;
mod ai;
mod login;
mod logout;
mod patients;
mod phone_login;
mod records;
mod signup;

pub use admin::{ListAuditLogs, ListUsers};
pub use ai::{AskRecord, NO_ANSWER, SemanticSearch};
pub use login::Login;
pub use logout::Logout;
pub use patients::SearchPatients;
pub use phone_login::PhoneLogin;
pub use records::{ListRecords, UploadRecord};
pub use signup::Signup;

use careportal_domain::ApiError;

use crate::error::ApplicationResult;

/// Appends an encoded query string to `path`.
fn with_query(path: &str, params: &[(&str, &str)]) -> ApplicationResult<String> {
    let query = serde_urlencoded::to_string(params)
        .map_err(|e| ApiError::validation(format!("Invalid query: {e}")))?;
    Ok(format!("{path}?{query}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_encodes_values() {
        assert_eq!(
            with_query("/records/", &[("search", "blood test & x-ray")]).unwrap(),
            "/records/?search=blood+test+%26+x-ray"
        );
    }
}
