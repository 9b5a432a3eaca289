//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod api_client;
mod credential_backend;
mod file_system;

pub use api_client::ApiClient;
pub use credential_backend::{CredentialBackend, CredentialError, ROLE_KEY, TOKEN_KEY};
pub use file_system::{FileSystem, FileSystemError};
