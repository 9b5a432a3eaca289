//! CarePortal Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The process-wide credential store
//! - The OTP-gated secure action coordinator
//! - Use case orchestration for the dashboards

pub mod auth;
pub mod error;
pub mod ports;
pub mod secure_action;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{CredentialStore, MemoryCredentialBackend};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ApiClient, CredentialBackend, CredentialError, FileSystem, FileSystemError};
pub use secure_action::{
    ActionOutcome, PendingPolicy, SecureActionCoordinator, SecureActionError, SecureActionPhase,
};
pub use use_cases::{
    AskRecord, ListAuditLogs, ListRecords, ListUsers, Login, Logout, PhoneLogin, SearchPatients,
    SemanticSearch, Signup, UploadRecord,
};
