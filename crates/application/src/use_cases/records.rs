//! Record listing and direct upload.

use std::sync::Arc;

use careportal_domain::{DomainError, RecordSummary, UploadFile, decode, endpoints};
use serde_json::Value;
use tracing::debug;

use super::with_query;
use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Lists the records visible to the signed-in user.
pub struct ListRecords<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> ListRecords<C> {
    /// Creates a new `ListRecords` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetches records, filtered by `search` when it is not blank.
    ///
    /// # Errors
    /// Returns the server's message, or a decode error for an unexpected
    /// payload.
    pub async fn execute(&self, search: Option<&str>) -> ApplicationResult<Vec<RecordSummary>> {
        let path = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => with_query(endpoints::RECORDS, &[("search", term)])?,
            None => endpoints::RECORDS.to_string(),
        };
        let records: Vec<RecordSummary> = decode(self.client.get(&path).await?)?;
        debug!(count = records.len(), "records listed");
        Ok(records)
    }
}

/// Uploads a record without an OTP challenge (patient self-service).
pub struct UploadRecord<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> UploadRecord<C> {
    /// Creates a new `UploadRecord` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Sends `file` as a multipart upload.
    ///
    /// # Errors
    /// - Returns a validation error if the file has no name
    /// - Returns the server's message if the upload is rejected
    pub async fn execute(&self, file: &UploadFile) -> ApplicationResult<Value> {
        if file.file_name.trim().is_empty() {
            return Err(DomainError::EmptyInput("File name").into());
        }
        let response = self
            .client
            .upload_file(endpoints::RECORDS_UPLOAD, file)
            .await?;
        debug!(file = %file.file_name, bytes = file.len(), "record uploaded");
        Ok(response)
    }
}
