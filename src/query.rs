use reqwest::Url;

/// Field every keyword is matched against on the backend.
pub const SEARCH_FIELD: &str = "search_all";

/// Fields requested for the suggestion popover.
pub const SUGGESTION_FIELDS: &str = "name,description";

/// Whitespace separated keywords, in the order the user typed them.
///
/// The first token drives the main `q` clause; every other token narrows the
/// result set as an independent filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: Vec<String>,
}

impl SearchQuery {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(input: &str) -> Option<SearchQuery> {
        let tokens: Vec<String> = input.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return None;
        }
        Some(SearchQuery { tokens })
    }

    pub fn primary(&self) -> &str {
        &self.tokens[0]
    }

    pub fn filters(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// The GET parameters sent to the backend for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    params: Vec<(&'static str, String)>,
}

impl BackendRequest {
    pub fn from_query(query: &SearchQuery) -> BackendRequest {
        Self::build(query, None)
    }

    /// Same clauses as a full search, restricted to the suggestion fields.
    pub fn suggestions(query: &SearchQuery) -> BackendRequest {
        Self::build(query, Some(SUGGESTION_FIELDS))
    }

    fn build(query: &SearchQuery, fields: Option<&str>) -> BackendRequest {
        let mut params = vec![
            ("indent", "true".to_string()),
            ("q.op", "AND".to_string()),
            ("useParams", String::new()),
        ];
        if let Some(fields) = fields {
            params.push(("fl", fields.to_string()));
        }

        params.push(("q", field_clause(query.primary())));
        for term in query.filters() {
            params.push(("fq", field_clause(term)));
        }

        BackendRequest { params }
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }
}

fn field_clause(term: &str) -> String {
    format!("{SEARCH_FIELD}:{}", urlencoding::encode(term))
}

#[test]
fn test_parse_splits_on_whitespace_runs() {
    let query = SearchQuery::parse("  vitamin \t d3\n\n2000 ").unwrap();
    assert_eq!(query.primary(), "vitamin");
    assert_eq!(query.filters(), ["d3".to_string(), "2000".to_string()]);
}

#[test]
fn test_parse_rejects_blank_input() {
    assert!(SearchQuery::parse("").is_none());
    assert!(SearchQuery::parse(" \t\n ").is_none());
}

#[test]
fn test_single_term_has_no_filters() {
    let query = SearchQuery::parse("aspirin").unwrap();
    let request = BackendRequest::from_query(&query);
    assert_eq!(request.values("q").collect::<Vec<_>>(), ["search_all:aspirin"]);
    assert_eq!(request.values("fq").count(), 0);
    assert_eq!(request.values("fl").count(), 0);
}

#[test]
fn test_terms_are_encoded_individually() {
    let query = SearchQuery::parse("café a&b").unwrap();
    let request = BackendRequest::from_query(&query);
    assert_eq!(request.values("q").collect::<Vec<_>>(), ["search_all:caf%C3%A9"]);
    assert_eq!(request.values("fq").collect::<Vec<_>>(), ["search_all:a%26b"]);
}
