use crate::data_models::SearchResult;

/// Number of entries produced by [`mock_results`].
pub const MOCK_RESULT_COUNT: usize = 3;

/// Deterministic stand-in results used when the backend cannot be reached.
///
/// Every entry embeds `query` so the page stays demonstrable offline.
pub fn mock_results(query: &str) -> Vec<SearchResult> {
    let dashed = join_words(query, "-");
    let underscored = join_words(query, "_");

    vec![
        SearchResult::new(
            format!("3D Tablet - {query}"),
            format!("https://example.com/result-1-about-{dashed}"),
            format!(
                "This is a medication called {query}. It provides health benefits and is used for various conditions."
            ),
        ),
        SearchResult::new(
            format!("Vitamin {query} - Comprehensive Guide"),
            format!("https://example.com/learn-about-{dashed}"),
            format!(
                "A comprehensive guide about {query} with detailed explanations, examples, and related information to help you understand this medication better."
            ),
        ),
        SearchResult::new(
            format!("{query} - Medical Information"),
            format!("https://en.wikipedia.org/wiki/{underscored}"),
            format!(
                "{query} refers to a medication that has various applications in different medical contexts. Learn about its usage, dosage, and side effects."
            ),
        ),
    ]
}

// Collapses each whitespace run into `sep`, keeping leading/trailing runs.
fn join_words(query: &str, sep: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut in_space = false;
    for c in query.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push_str(sep);
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[test]
fn test_mock_results_embed_query() {
    let results = mock_results("aspirin");
    assert_eq!(results.len(), MOCK_RESULT_COUNT);
    for r in &results {
        assert!(r.title.contains("aspirin"));
        assert!(r.url.contains("aspirin"));
        assert!(r.snippet.contains("aspirin"));
    }
}

#[test]
fn test_mock_results_are_deterministic() {
    assert_eq!(mock_results("vitamin d3"), mock_results("vitamin d3"));
}

#[test]
fn test_mock_urls_join_words() {
    let results = mock_results("vitamin  d3");
    assert_eq!(results[0].url, "https://example.com/result-1-about-vitamin-d3");
    assert_eq!(results[1].url, "https://example.com/learn-about-vitamin-d3");
    assert_eq!(results[2].url, "https://en.wikipedia.org/wiki/vitamin_d3");
}
