//! CarePortal Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus runtime configuration.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestApiClient, UPLOAD_FIELD};
pub use config::{ConfigError, DEFAULT_API_URL, DEFAULT_TIMEOUT, PortalConfig};
pub use persistence::{FileCredentialBackend, TokioFileSystem};
pub use serialization::{
    SESSION_SCHEMA_VERSION, SerializationError, SessionDocument, from_json_bytes,
    to_json_stable_bytes,
};
