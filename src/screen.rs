use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

use crate::client::SearchService;
use crate::config::Config;
use crate::data_models::{BackendDoc, SearchResult, name_suggestions};
use crate::suggest::SuggestionFetcher;

pub const ERROR_TITLE: &str = "Search Error";
pub const ERROR_DESCRIPTION: &str = "There was a problem with your search. Please try again.";

/// Dismissible toast shown after a failed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    fn search_error() -> Notification {
        Notification {
            title: ERROR_TITLE.to_string(),
            description: ERROR_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub notification: Option<Notification>,
    /// Documents of the last successful search, source of name suggestions.
    pub raw_docs: Vec<BackendDoc>,
}

/// The four mutually exclusive things the result area can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Results {
        query: String,
        results: Vec<SearchResult>,
    },
    NoResults {
        query: String,
    },
    Welcome,
}

impl ScreenState {
    pub fn view(&self) -> View {
        if self.loading {
            View::Loading
        } else if self.query.is_empty() {
            View::Welcome
        } else if self.results.is_empty() {
            View::NoResults {
                query: self.query.clone(),
            }
        } else {
            View::Results {
                query: self.query.clone(),
                results: self.results.clone(),
            }
        }
    }
}

pub struct SearchScreen<S> {
    service: Arc<S>,
    state: watch::Sender<ScreenState>,
    suggestions: SuggestionFetcher<S>,
    latest: AtomicU64,
}

impl<S: SearchService> SearchScreen<S> {
    pub fn new(service: Arc<S>, suggest_debounce: Duration) -> Self {
        let (state, _) = watch::channel(ScreenState::default());
        Self {
            suggestions: SuggestionFetcher::new(service.clone(), suggest_debounce),
            service,
            state,
            latest: AtomicU64::new(0),
        }
    }

    pub fn from_config(service: Arc<S>, config: &Config) -> Self {
        Self::new(service, config.suggest_debounce())
    }

    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ScreenState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> View {
        self.state.borrow().view()
    }

    pub fn suggestions(&self) -> &SuggestionFetcher<S> {
        &self.suggestions
    }

    /// Keystroke in the search box.
    pub fn on_input(&self, text: &str) {
        self.suggestions.on_input(text);
    }

    /// Runs a search for `input` and applies its outcome.
    ///
    /// Blank input is ignored. When several submits overlap only the most
    /// recently issued one is applied; older responses are dropped when they
    /// resolve.
    pub async fn submit(&self, input: &str) {
        let query = input.trim();
        if query.is_empty() {
            return;
        }

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard {
            state: &self.state,
            latest: &self.latest,
            ticket,
        };
        self.suggestions.close();
        self.state.send_modify(|s| {
            s.loading = true;
            s.query = query.to_string();
        });

        let outcome = self.service.search(query).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!("discarding stale results for {query:?}");
            return;
        }

        if let Some(reason) = outcome.failure() {
            tracing::error!("search error: {reason}");
        }
        let failed = outcome.failure().is_some();

        self.state.send_modify(|s| {
            s.notification = failed.then(Notification::search_error);
            if let Some(docs) = outcome.raw_docs {
                s.raw_docs = docs;
            }
            s.results = outcome.results;
            s.loading = false;
        });
    }

    pub fn dismiss_notification(&self) {
        self.state.send_if_modified(|s| s.notification.take().is_some());
    }

    pub fn name_suggestions(&self) -> Vec<String> {
        name_suggestions(&self.state.borrow().raw_docs)
    }
}

/// Clears `loading` however `submit` exits: completion, a dropped future or a
/// panicking service. Only the latest ticket may touch the flag.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ScreenState>,
    latest: &'a AtomicU64,
    ticket: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.latest.load(Ordering::SeqCst) != self.ticket {
            return;
        }
        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }
}
