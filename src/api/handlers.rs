use axum::Json;
use axum::extract::{Query, State};
use std::sync::Arc;
use std::time::Instant;

use crate::client::SearchService;
use crate::config::MIN_SUGGEST_LEN;
use crate::data_models::name_suggestions;

use super::models::{SearchParams, SearchResponse, SuggestResponse};

pub async fn search_handler<S: SearchService>(
    State(service): State<Arc<S>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = Instant::now();
    let query = params.q.trim().to_string();

    let highlighted_terms: Vec<String> = query.split_whitespace().map(str::to_string).collect();

    let outcome = service.search(&query).await;
    let names = outcome
        .raw_docs
        .as_deref()
        .map(name_suggestions)
        .unwrap_or_default();

    let total_results = outcome.results.len();
    let processing_time_ms = start.elapsed().as_millis();

    Json(SearchResponse {
        query,
        results: outcome.results,
        total_results,
        processing_time_ms,
        highlighted_terms,
        origin: outcome.origin,
        names,
    })
}

pub async fn suggest_handler<S: SearchService>(
    State(service): State<Arc<S>>,
    Query(params): Query<SearchParams>,
) -> Json<SuggestResponse> {
    let query = params.q.trim().to_string();

    if query.chars().count() < MIN_SUGGEST_LEN {
        return Json(SuggestResponse {
            query,
            suggestions: Vec::new(),
        });
    }

    let suggestions = service.suggest(&query).await.unwrap_or_else(|e| {
        tracing::warn!("suggestions for {query:?} failed: {e:#}");
        Vec::new()
    });

    Json(SuggestResponse { query, suggestions })
}
