//! Remote endpoint paths, relative to the API base address.

use crate::error::{DomainError, DomainResult};

/// Email/password login.
pub const LOGIN: &str = "/auth/login";
/// Patient self-registration.
pub const SIGNUP: &str = "/auth/signup";
/// Send a login OTP to a phone number.
pub const SEND_PHONE_OTP: &str = "/auth/send-otp";
/// Verify a login OTP.
pub const VERIFY_PHONE_OTP: &str = "/auth/verify-otp";
/// Send an OTP guarding a sensitive manager action.
pub const MANAGER_SEND_OTP: &str = "/manager/send-otp";
/// Verify an OTP guarding a sensitive manager action.
pub const MANAGER_VERIFY_OTP: &str = "/manager/verify-otp";
/// Record listing.
pub const RECORDS: &str = "/records/";
/// Multipart record upload.
pub const RECORDS_UPLOAD: &str = "/records/upload";
/// Semantic search across records.
pub const AI_SEARCH: &str = "/ai/search";
/// User listing (admin).
pub const ADMIN_USERS: &str = "/admin/users";
/// Audit log listing (admin).
pub const ADMIN_AUDIT_LOGS: &str = "/admin/audit-logs";
/// Patient search.
pub const PATIENTS_SEARCH: &str = "/patients/search";

/// Encodes `record_id` as exactly one path segment.
///
/// Reserved characters such as `/`, `?` and `#` are percent-encoded. Dot
/// segments are rejected because URL parsers resolve them (encoded or not)
/// against the parent path.
///
/// # Errors
/// - [`DomainError::EmptyInput`] for an empty id
/// - [`DomainError::InvalidRecordId`] for `.` or `..`
pub fn record_segment(record_id: &str) -> DomainResult<String> {
    if record_id.is_empty() {
        return Err(DomainError::EmptyInput("Record id"));
    }
    if record_id == "." || record_id == ".." {
        return Err(DomainError::InvalidRecordId(record_id.to_string()));
    }
    Ok(urlencoding::encode(record_id).into_owned())
}

/// Path of a single record.
///
/// # Errors
/// Returns an error if `record_id` is not a usable path segment.
pub fn record(record_id: &str) -> DomainResult<String> {
    Ok(format!("/records/{}", record_segment(record_id)?))
}

/// Path for asking a question about one record.
///
/// # Errors
/// Returns an error if `record_id` is not a usable path segment.
pub fn ai_ask(record_id: &str) -> DomainResult<String> {
    Ok(format!("/ai/ask/{}", record_segment(record_id)?))
}
