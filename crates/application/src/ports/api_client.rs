//! API client port

use std::future::Future;

use careportal_domain::{ApiMethod, ApiResult, UploadFile};
use serde_json::Value;

/// Port for every outbound call to the portal API.
///
/// Implementations attach the current bearer credential, shape errors into
/// [`careportal_domain::ApiError`], and never panic or propagate transport
/// faults. They do not retry and do not touch the credential store.
///
/// Paths are relative to the implementation's base address.
pub trait ApiClient: Send + Sync {
    /// Sends a JSON request. A `body` of `None` sends no body.
    ///
    /// Resolves to the parsed JSON body on a success status, or `Null` when
    /// the success body is empty.
    fn request(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = ApiResult<Value>> + Send;

    /// Sends `file` as a multipart body with a single field named `file`.
    fn upload_file(
        &self,
        path: &str,
        file: &UploadFile,
    ) -> impl Future<Output = ApiResult<Value>> + Send;

    /// `GET path`.
    fn get(&self, path: &str) -> impl Future<Output = ApiResult<Value>> + Send {
        self.request(ApiMethod::Get, path, None)
    }

    /// `POST path` with an optional JSON body.
    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = ApiResult<Value>> + Send {
        self.request(ApiMethod::Post, path, body)
    }

    /// `PUT path` with an optional JSON body.
    fn put(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = ApiResult<Value>> + Send {
        self.request(ApiMethod::Put, path, body)
    }

    /// `DELETE path`.
    fn delete(&self, path: &str) -> impl Future<Output = ApiResult<Value>> + Send {
        self.request(ApiMethod::Delete, path, None)
    }
}
