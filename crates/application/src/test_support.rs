//! Recording mock of the API client port for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use careportal_domain::{ApiMethod, ApiResult, UploadFile};
use serde_json::{Value, json};

use crate::ports::ApiClient;

/// One call observed by [`MockApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// A JSON request.
    Json {
        method: ApiMethod,
        path: String,
        body: Option<Value>,
    },
    /// A multipart upload.
    Upload { path: String, file: UploadFile },
}

impl Call {
    pub fn path(&self) -> &str {
        match self {
            Self::Json { path, .. } | Self::Upload { path, .. } => path,
        }
    }
}

/// Mock API client that records calls and replays scripted responses.
///
/// Responses are queued per `(method, path)`; uploads are keyed as `POST`.
/// An unscripted call succeeds with `{}`.
#[derive(Default)]
pub struct MockApiClient {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<HashMap<(ApiMethod, String), VecDeque<ApiResult<Value>>>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next call to `method path`.
    pub fn respond(&self, method: ApiMethod, path: &str, result: ApiResult<Value>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.path().to_string()).collect()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path() == path).count()
    }

    fn next_response(&self, method: ApiMethod, path: &str) -> ApiResult<Value> {
        self.responses
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(json!({})))
    }
}

impl ApiClient for MockApiClient {
    fn request(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = ApiResult<Value>> + Send {
        self.calls.lock().unwrap().push(Call::Json {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        std::future::ready(self.next_response(method, path))
    }

    fn upload_file(
        &self,
        path: &str,
        file: &UploadFile,
    ) -> impl Future<Output = ApiResult<Value>> + Send {
        self.calls.lock().unwrap().push(Call::Upload {
            path: path.to_string(),
            file: file.clone(),
        });
        std::future::ready(self.next_response(ApiMethod::Post, path))
    }
}
