//! CarePortal Domain - Core types
//!
//! This crate defines the domain model for the CarePortal client core.
//! All types here are pure Rust with no I/O dependencies.

pub mod action;
pub mod api;
pub mod auth;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod otp;
pub mod records;

pub use action::{ActionKind, ChallengeState, DeferredOperation, PendingAction, UploadFile};
pub use api::{
    ApiError, ApiErrorKind, ApiMethod, ApiResult, NETWORK_ERROR, REQUEST_FAILED, UPLOAD_FAILED,
    decode, encode, error_message_from_body,
};
pub use auth::{
    LoginRequest, PatientProfile, PhoneOtpRequest, PhoneOtpVerifyRequest, SignupForm,
    SignupRequest, TokenResponse, UserProfile,
};
pub use credential::{Credential, DEFAULT_ROLE, token_preview};
pub use error::{DomainError, DomainResult};
pub use otp::{OTP_LENGTH, OtpCode};
pub use records::{AskAnswer, AuditLogEntry, PatientSummary, RecordSummary, SearchHit, UserSummary};
