//! HTTP search backend for the industry-shift phase.
//!
//! Issues `GET {endpoint}?q=<query>&limit=<n>` and expects
//! `{ "results": [ { "title", "url", "snippet", "published"? } ] }`.

use std::time::Duration;

use serde::Deserialize;

use codex_core::shift::ShiftSearch;
use codex_types::config::IndustrySearchConfig;
use codex_types::error::ShiftSearchError;
use codex_types::industry::{SearchHit, ShiftQuery};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// JSON-over-HTTP search client.
#[derive(Debug, Clone)]
pub struct HttpShiftSearch {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpShiftSearch {
    pub fn new(config: &IndustrySearchConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codex-audit/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: config.endpoint.clone(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ShiftSearch for HttpShiftSearch {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &ShiftQuery) -> Result<Vec<SearchHit>, ShiftSearchError> {
        let limit = query.max_results.to_string();
        tracing::debug!(endpoint = %self.endpoint, query = %query.query, "Searching");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query.query.as_str()), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| ShiftSearchError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShiftSearchError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ShiftSearchError::InvalidResponse(e.to_string()))?;
        Ok(body.results)
    }
}
