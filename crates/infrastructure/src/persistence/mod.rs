//! Durable storage adapters.

mod credential_file;
mod file_system;

pub use credential_file::FileCredentialBackend;
pub use file_system::TokioFileSystem;
