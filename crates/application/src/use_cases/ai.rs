//! Questions about a single record and semantic search across records.
//!
//! The answering and ranking happen server-side; these use cases only shape
//! the requests and tolerate the response variants the service produces.

use std::sync::Arc;

use careportal_domain::{AskAnswer, DomainError, SearchHit, decode, endpoints};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Answer shown when the service replies without one.
pub const NO_ANSWER: &str = "No response received";

/// Asks a free-text question about one record.
pub struct AskRecord<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> AskRecord<C> {
    /// Creates a new `AskRecord` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Returns the service's answer to `question` about `record_id`.
    ///
    /// # Errors
    /// - Returns a validation error for a blank question or record id
    /// - Returns the server's message if the question could not be answered
    pub async fn execute(&self, record_id: &str, question: &str) -> ApplicationResult<String> {
        let record_id = record_id.trim();
        if record_id.is_empty() {
            return Err(DomainError::EmptyInput("Record id").into());
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::EmptyInput("Question").into());
        }

        let body = json!({ "question": question });
        let response = self
            .client
            .post(&endpoints::ai_ask(record_id)?, Some(&body))
            .await?;
        let answer: AskAnswer = decode(response)?;
        Ok(answer
            .answer
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Wrapped { results: Vec<SearchHit> },
    Bare(Vec<SearchHit>),
}

/// Ranks records by semantic similarity to a query.
pub struct SemanticSearch<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> SemanticSearch<C> {
    /// Creates a new `SemanticSearch` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Returns matches for `query`, best first as ranked by the service.
    ///
    /// # Errors
    /// - Returns a validation error for a blank query
    /// - Returns the server's message, or a decode error for an unexpected
    ///   payload
    pub async fn execute(&self, query: &str) -> ApplicationResult<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::EmptyInput("Search query").into());
        }

        let body = json!({ "query": query });
        let response = self.client.post(endpoints::AI_SEARCH, Some(&body)).await?;
        let hits = match decode(response)? {
            SearchResponse::Wrapped { results } | SearchResponse::Bare(results) => results,
        };
        debug!(count = hits.len(), "semantic search complete");
        Ok(hits)
    }
}
