use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between issuing a backend request and
/// holding a parsed JSON body.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request to search backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search backend answered with HTTP {0}")]
    Status(StatusCode),

    #[error("search backend returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
