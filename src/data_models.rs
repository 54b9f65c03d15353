use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description available";
pub const PLACEHOLDER_URL: &str = "#";

/// One entry of the result list shown to the user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(title: String, url: String, snippet: String) -> SearchResult {
        SearchResult {
            title,
            url,
            snippet,
        }
    }
}

/// Lighter projection used by the live suggestion popover.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub description: String,
}

/// Lenient view of a single backend document.
///
/// The index is schemaless from our point of view, so every field is optional
/// and anything that is not a non-empty string is treated as missing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendDoc {
    pub name: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    /// First element of the `description` array (or the bare string).
    pub description: Option<String>,
    pub snippet: Option<String>,
}

impl BackendDoc {
    pub fn from_value(value: &Value) -> BackendDoc {
        BackendDoc {
            name: string_field(value, "name"),
            title: string_field(value, "title"),
            url: string_field(value, "url"),
            description: first_description(value),
            snippet: string_field(value, "snippet"),
        }
    }

    pub fn to_result(&self) -> SearchResult {
        let title = self
            .name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(UNTITLED);
        let url = self.url.as_deref().unwrap_or(PLACEHOLDER_URL);
        let snippet = self
            .description
            .as_deref()
            .or(self.snippet.as_deref())
            .unwrap_or(NO_DESCRIPTION);

        SearchResult::new(title.to_string(), url.to_string(), snippet.to_string())
    }

    pub fn to_suggestion(&self) -> Suggestion {
        Suggestion {
            name: self
                .name
                .as_deref()
                .or(self.title.as_deref())
                .unwrap_or(UNTITLED)
                .to_string(),
            description: self
                .description
                .as_deref()
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
        }
    }
}

/// Pulls `response.docs` out of a backend body.
///
/// Returns `None` when the body does not carry a docs array, which callers
/// treat as "no results" rather than as a failure.
pub fn docs_from_response(body: &Value) -> Option<Vec<BackendDoc>> {
    body.pointer("/response/docs")
        .and_then(Value::as_array)
        .map(|docs| docs.iter().map(BackendDoc::from_value).collect())
}

/// Distinct document names, first occurrence wins.
pub fn name_suggestions(docs: &[BackendDoc]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in docs.iter().filter_map(|d| d.name.as_ref()) {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_description(value: &Value) -> Option<String> {
    let description = match value.get("description")? {
        Value::Array(items) => items.first().and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };
    description.filter(|s| !s.is_empty()).map(str::to_string)
}
