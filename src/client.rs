use anyhow::{Context, Result};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

use crate::config::Config;
use crate::data_models::{BackendDoc, SearchResult, Suggestion, docs_from_response};
use crate::error::SearchError;
use crate::mock::mock_results;
use crate::query::{BackendRequest, SearchQuery};

/// Where the results of a [`SearchOutcome`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultOrigin {
    Backend,
    /// Blank input, nothing was sent.
    Skipped,
    /// Backend failed and mock results were substituted.
    Mock { reason: String },
    /// Backend failed and mock fallback is disabled.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    /// Raw documents of a successful response, kept by the caller for name
    /// suggestions. `None` means "leave whatever you had".
    pub raw_docs: Option<Vec<BackendDoc>>,
    pub origin: ResultOrigin,
}

impl SearchOutcome {
    pub fn skipped() -> SearchOutcome {
        SearchOutcome {
            results: Vec::new(),
            raw_docs: None,
            origin: ResultOrigin::Skipped,
        }
    }

    pub fn from_docs(docs: Option<Vec<BackendDoc>>) -> SearchOutcome {
        let results = docs
            .as_deref()
            .map(|docs| docs.iter().map(BackendDoc::to_result).collect())
            .unwrap_or_default();
        SearchOutcome {
            results,
            raw_docs: docs,
            origin: ResultOrigin::Backend,
        }
    }

    pub fn mocked(query: &str, reason: String) -> SearchOutcome {
        SearchOutcome {
            results: mock_results(query),
            raw_docs: None,
            origin: ResultOrigin::Mock { reason },
        }
    }

    pub fn failed(reason: String) -> SearchOutcome {
        SearchOutcome {
            results: Vec::new(),
            raw_docs: None,
            origin: ResultOrigin::Failed { reason },
        }
    }

    /// The backend error behind this outcome, if any.
    pub fn failure(&self) -> Option<&str> {
        match &self.origin {
            ResultOrigin::Mock { reason } | ResultOrigin::Failed { reason } => Some(reason),
            ResultOrigin::Backend | ResultOrigin::Skipped => None,
        }
    }
}

/// Anything the screen, the suggestion popover and the HTTP API can query.
pub trait SearchService: Send + Sync + 'static {
    /// Never fails; backend trouble is reported through [`SearchOutcome::origin`].
    fn search(&self, query: &str) -> impl Future<Output = SearchOutcome> + Send;

    fn suggest(&self, query: &str) -> impl Future<Output = Result<Vec<Suggestion>, SearchError>> + Send;
}

/// HTTP client for a Solr style `select` endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: Url,
    mock_fallback: bool,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid search backend URL: {base_url}"))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            mock_fallback: true,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.solr_url)?.with_mock_fallback(config.mock_fallback))
    }

    pub fn with_mock_fallback(mut self, enabled: bool) -> Self {
        self.mock_fallback = enabled;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fallible search path; `search` wraps this with the fallback policy.
    pub async fn try_search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let Some(query) = SearchQuery::parse(query) else {
            return Ok(SearchOutcome::skipped());
        };
        let body = self.fetch(&BackendRequest::from_query(&query)).await?;
        Ok(SearchOutcome::from_docs(docs_from_response(&body)))
    }

    async fn fetch(&self, request: &BackendRequest) -> Result<Value, SearchError> {
        let url = request.to_url(&self.base_url);
        tracing::debug!("requesting {url}");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl SearchService for SearchClient {
    async fn search(&self, query: &str) -> SearchOutcome {
        match self.try_search(query).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("search for {query:?} failed: {e:#}");
                if self.mock_fallback {
                    SearchOutcome::mocked(query, e.to_string())
                } else {
                    SearchOutcome::failed(e.to_string())
                }
            }
        }
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        let Some(query) = SearchQuery::parse(query) else {
            return Ok(Vec::new());
        };
        let body = self.fetch(&BackendRequest::suggestions(&query)).await?;
        Ok(docs_from_response(&body)
            .unwrap_or_default()
            .iter()
            .map(BackendDoc::to_suggestion)
            .collect())
    }
}
