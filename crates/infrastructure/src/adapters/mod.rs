//! Adapters for outbound ports.

mod reqwest_client;

pub use reqwest_client::{ReqwestApiClient, UPLOAD_FIELD};
