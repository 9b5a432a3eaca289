//! Patient directory search.

use std::sync::Arc;

use careportal_domain::{PatientSummary, decode, endpoints};

use super::with_query;
use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Searches patients by name or medical id.
pub struct SearchPatients<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> SearchPatients<C> {
    /// Creates a new `SearchPatients` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Returns patients matching `query`. A blank query returns an empty
    /// list without a request.
    ///
    /// # Errors
    /// Returns the server's message, or a decode error for an unexpected
    /// payload.
    pub async fn execute(&self, query: &str) -> ApplicationResult<Vec<PatientSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let path = with_query(endpoints::PATIENTS_SEARCH, &[("q", query)])?;
        Ok(decode(self.client.get(&path).await?)?)
    }
}
