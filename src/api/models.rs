use serde::{Deserialize, Serialize};

use crate::client::ResultOrigin;
use crate::data_models::{SearchResult, Suggestion};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub processing_time_ms: u128,
    pub highlighted_terms: Vec<String>,
    pub origin: ResultOrigin,
    /// Distinct document names of this response, for the name picker.
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}
