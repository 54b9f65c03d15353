use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr/mrs/select";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 300;

/// Suggestions are only fetched once the trimmed input reaches this many characters.
pub const MIN_SUGGEST_LEN: usize = 2;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        solr_url: get_env_or_default("SOLR_URL", DEFAULT_SOLR_URL),
        bind_addr: get_env_or_default("EXPLORER_BIND", DEFAULT_BIND_ADDR),
        mock_fallback: get_env_flag("EXPLORER_MOCK_FALLBACK", true),
        suggest_debounce_ms: get_env_parsed(
            "EXPLORER_SUGGEST_DEBOUNCE_MS",
            DEFAULT_SUGGEST_DEBOUNCE_MS,
        ),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub solr_url: String,
    pub bind_addr: String,
    /// Serve deterministic mock results when the backend is unreachable.
    pub mock_fallback: bool,
    pub suggest_debounce_ms: u64,
}

impl Config {
    pub fn suggest_debounce(&self) -> Duration {
        Duration::from_millis(self.suggest_debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            solr_url: DEFAULT_SOLR_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            mock_fallback: true,
            suggest_debounce_ms: DEFAULT_SUGGEST_DEBOUNCE_MS,
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring unparsable value for {key}: {raw:?}");
            default
        }),
        Err(_) => default,
    }
}

fn get_env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[test]
fn test_parse_flag() {
    assert_eq!(parse_flag("TRUE"), Some(true));
    assert_eq!(parse_flag(" on "), Some(true));
    assert_eq!(parse_flag("0"), Some(false));
    assert_eq!(parse_flag("off"), Some(false));
    assert_eq!(parse_flag("maybe"), None);
    assert_eq!(parse_flag(""), None);
}
