//! Session credentials for the CarePortal client.
//!
//! This module provides:
//! - The process-wide credential store, backed by an injectable persistence port
//! - An in-memory backend for tests and ephemeral sessions

mod credential_store;
mod memory_backend;

pub use credential_store::CredentialStore;
pub use memory_backend::MemoryCredentialBackend;
