//! API client implementation using reqwest.
//!
//! This adapter implements the `ApiClient` port. It is the single place that
//! attaches the bearer credential and turns HTTP outcomes into `ApiResult`.

use std::error::Error as _;

use careportal_application::CredentialStore;
use careportal_application::ports::ApiClient;
use careportal_domain::{
    ApiError, ApiMethod, ApiResult, NETWORK_ERROR, REQUEST_FAILED, UPLOAD_FAILED, UploadFile,
    error_message_from_body, token_preview,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ConfigError, PortalConfig};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Portal API client backed by `reqwest::Client`.
///
/// Reads the token from the shared [`CredentialStore`] on every call, so a
/// login or logout takes effect for the next request without rebuilding the
/// client.
pub struct ReqwestApiClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ReqwestApiClient {
    /// Creates a client from the portal configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(config: &PortalConfig, credentials: CredentialStore) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self::with_client(
            client,
            config.api_base_url.as_str(),
            credentials,
        ))
    }

    /// Creates a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        credentials: CredentialStore,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credentials,
        }
    }

    /// Returns the base address requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Converts domain `ApiMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: ApiMethod) -> Method {
        match method {
            ApiMethod::Get => Method::GET,
            ApiMethod::Post => Method::POST,
            ApiMethod::Put => Method::PUT,
            ApiMethod::Delete => Method::DELETE,
        }
    }

    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.get().await {
            Some(token) => {
                debug!(token = %token_preview(&token), "attaching bearer credential");
                builder.bearer_auth(token)
            }
            None => builder,
        }
    }

    /// Turns a response into the uniform result shape.
    async fn read_response(response: Response, fallback: &str) -> ApiResult<Value> {
        let status = response.status();
        let url = response.url().path().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(&e, fallback))?;

        if !status.is_success() {
            let message = error_message_from_body(&bytes, fallback);
            warn!(status = status.as_u16(), path = %url, error = %message, "request rejected");
            return Err(ApiError::application(status.as_u16(), message));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(status = status.as_u16(), path = %url, error = %e, "unparsable success body");
            ApiError::decode(format!("Invalid response: {e}"))
        })
    }

    /// Maps a reqwest error to a transport `ApiError`, keeping its cause.
    fn transport_error(error: &reqwest::Error, fallback: &str) -> ApiError {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        if message.trim().is_empty() {
            message = fallback.to_string();
        }
        if error.is_timeout() {
            warn!(error = %message, "request timed out");
        } else {
            warn!(error = %message, "transport failure");
        }
        ApiError::transport(message)
    }

    fn file_part(file: &UploadFile) -> ApiResult<Part> {
        let mime = file.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&file.file_name)
                .first_or_octet_stream()
                .to_string()
        });

        Part::bytes(file.content.clone())
            .file_name(file.file_name.clone())
            .mime_str(&mime)
            .map_err(|e| ApiError::validation(format!("Invalid content type '{mime}': {e}")))
    }
}

impl ApiClient for ReqwestApiClient {
    async fn request(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(method), &url)
            .header(CONTENT_TYPE, "application/json");
        builder = self.authorize(builder).await;
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(&e, NETWORK_ERROR))?;

        Self::read_response(response, REQUEST_FAILED).await
    }

    async fn upload_file(&self, path: &str, file: &UploadFile) -> ApiResult<Value> {
        let url = self.url(path);
        debug!(%url, file = %file.file_name, bytes = file.len(), "uploading file");

        let form = Form::new().part(UPLOAD_FIELD, Self::file_part(file)?);
        // The multipart boundary header is set by reqwest.
        let builder = self.client.post(&url).multipart(form);
        let builder = self.authorize(builder).await;

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(&e, UPLOAD_FAILED))?;

        Self::read_response(response, UPLOAD_FAILED).await
    }
}

impl std::fmt::Debug for ReqwestApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use careportal_domain::ApiErrorKind;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn signed_in(token: &str) -> CredentialStore {
        let store = CredentialStore::in_memory();
        store.set(token).await.unwrap();
        store
    }

    fn client_for(server: &Server, credentials: CredentialStore) -> ReqwestApiClient {
        ReqwestApiClient::with_client(
            Client::new(),
            format!("{}/api/", server.url()),
            credentials,
        )
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestApiClient::to_reqwest_method(ApiMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestApiClient::to_reqwest_method(ApiMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_url_joining() {
        let client = ReqwestApiClient::with_client(
            Client::new(),
            "http://localhost:8000/api/",
            CredentialStore::in_memory(),
        );
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url("/records/"),
            "http://localhost:8000/api/records/"
        );
        assert_eq!(
            client.url("auth/login"),
            "http://localhost:8000/api/auth/login"
        );
    }

    #[tokio::test]
    async fn test_json_call_sends_bearer_and_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ai/search")
            .match_header("authorization", "Bearer tok-123")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"query": "mri"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok-123").await);
        let result = client
            .post("/ai/search", Some(&json!({"query": "mri"})))
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), json!({"results": []}));
    }

    #[tokio::test]
    async fn test_put_sends_method_body_bearer_and_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/records/r1")
            .match_header("authorization", "Bearer tok-123")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"title": "Lipid panel"})))
            .with_status(200)
            .with_body(r#"{"id": "r1", "title": "Lipid panel"}"#)
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok-123").await);
        let result = client
            .put("/records/r1", Some(&json!({"title": "Lipid panel"})))
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), json!({"id": "r1", "title": "Lipid panel"}));
    }

    #[tokio::test]
    async fn test_record_path_cannot_escape_records() {
        let mut server = Server::new_async().await;
        let admin = server
            .mock("DELETE", "/api/admin/users")
            .expect(0)
            .create_async()
            .await;
        let record = server
            .mock("DELETE", Matcher::Regex(r"^/api/records/[^/]+$".to_string()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok-123").await);
        let path = careportal_domain::endpoints::record("../admin/users").unwrap();
        client.delete(&path).await.unwrap();

        record.assert_async().await;
        admin.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_authorization_header_when_signed_out() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/records/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server, CredentialStore::in_memory());
        let result = client.get("/records/").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_token_change_applies_to_next_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/admin/users")
            .match_header("authorization", "Bearer second")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let store = signed_in("first").await;
        let client = client_for(&server, store.clone());
        store.set("second").await.unwrap();

        client.get("/admin/users").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/records/r1")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok").await);

        assert_eq!(client.delete("/records/r1").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces_server_detail_verbatim() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"detail": "Incorrect email or password"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/admin/users")
            .with_status(403)
            .with_body(r#"{"detail": "Not enough permissions"}"#)
            .create_async()
            .await;

        let client = client_for(&server, CredentialStore::in_memory());

        let err = client.post("/auth/login", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert_eq!(err.kind, ApiErrorKind::Application { status: 401 });

        let err = client.get("/admin/users").await.unwrap_err();
        assert_eq!(err.to_string(), "Not enough permissions");
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_unparsable_error_body_uses_fallback() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/records/")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;
        server
            .mock("POST", "/api/records/upload")
            .with_status(502)
            .with_body("Bad gateway")
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok").await);

        let err = client.get("/records/").await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(err.status(), Some(500));

        let err = client
            .upload_file("/records/upload", &UploadFile::new("a.pdf", vec![1]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Upload failed");
    }

    #[tokio::test]
    async fn test_unparsable_success_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/records/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok").await);
        let err = client.get("/records/").await.unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_upload_sends_single_file_field() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/records/upload")
            .match_header("authorization", "Bearer tok")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="scan.pdf""#.to_string()),
                Matcher::Regex("Content-Type: application/pdf".to_string()),
                Matcher::Regex("%PDF-1.7".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"id": "r9", "title": "scan.pdf"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, signed_in("tok").await);
        let response = client
            .upload_file(
                "/records/upload",
                &UploadFile::new("scan.pdf", b"%PDF-1.7".to_vec()),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response["id"], "r9");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = ReqwestApiClient::with_client(
            Client::new(),
            "http://127.0.0.1:1/api",
            CredentialStore::in_memory(),
        );

        let err = client.get("/records/").await.unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(err.is_retryable());
        assert!(!err.message().is_empty());
    }
}
