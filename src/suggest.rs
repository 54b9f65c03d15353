use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::client::SearchService;
use crate::config::{Config, MIN_SUGGEST_LEN};
use crate::data_models::Suggestion;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SuggestionState {
    #[default]
    Idle,
    Debouncing,
    Loading,
    Populated(Vec<Suggestion>),
    Empty,
}

/// What the suggestion popover should display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionPanel {
    pub query: String,
    pub state: SuggestionState,
    pub open: bool,
}

impl SuggestionPanel {
    pub fn suggestions(&self) -> &[Suggestion] {
        match &self.state {
            SuggestionState::Populated(items) => items,
            _ => &[],
        }
    }
}

/// Fetches suggestions while the user types.
///
/// Each keystroke cancels the previously scheduled fetch, so only the last
/// input of a burst reaches the backend, `debounce` after it was typed.
pub struct SuggestionFetcher<S> {
    service: Arc<S>,
    debounce: Duration,
    min_len: usize,
    panel: watch::Sender<SuggestionPanel>,
    pending: Mutex<Option<CancellationToken>>,
}

impl<S: SearchService> SuggestionFetcher<S> {
    pub fn new(service: Arc<S>, debounce: Duration) -> Self {
        let (panel, _) = watch::channel(SuggestionPanel::default());
        Self {
            service,
            debounce,
            min_len: MIN_SUGGEST_LEN,
            panel,
            pending: Mutex::new(None),
        }
    }

    pub fn from_config(service: Arc<S>, config: &Config) -> Self {
        Self::new(service, config.suggest_debounce())
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionPanel> {
        self.panel.subscribe()
    }

    pub fn snapshot(&self) -> SuggestionPanel {
        self.panel.borrow().clone()
    }

    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, text: &str) {
        let query = text.trim().to_string();
        let token = self.reschedule();

        if query.chars().count() < self.min_len {
            self.panel.send_replace(SuggestionPanel {
                query,
                state: SuggestionState::Idle,
                open: false,
            });
            return;
        }

        self.panel.send_replace(SuggestionPanel {
            query: query.clone(),
            state: SuggestionState::Debouncing,
            open: true,
        });

        let service = self.service.clone();
        let panel = self.panel.clone();
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }
            publish(&panel, &token, SuggestionState::Loading);

            let fetched = tokio::select! {
                _ = token.cancelled() => return,
                fetched = service.suggest(&query) => fetched,
            };
            let state = match fetched {
                Ok(items) if items.is_empty() => SuggestionState::Empty,
                Ok(items) => SuggestionState::Populated(items),
                Err(e) => {
                    tracing::warn!("suggestions for {query:?} failed: {e:#}");
                    SuggestionState::Idle
                }
            };
            publish(&panel, &token, state);
        });
    }

    /// Picks the suggestion at `index` and closes the popover.
    pub fn select(&self, index: usize) -> Option<Suggestion> {
        let picked = self.panel.borrow().suggestions().get(index).cloned();
        if picked.is_some() {
            self.close();
        }
        picked
    }

    /// Closes the popover and drops any fetch still in flight.
    pub fn close(&self) {
        self.cancel_pending();
        self.panel.send_modify(|p| {
            p.open = false;
            p.state = SuggestionState::Idle;
        });
    }

    fn reschedule(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    fn cancel_pending(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
    }
}

fn publish(panel: &watch::Sender<SuggestionPanel>, token: &CancellationToken, state: SuggestionState) {
    // checked under the watch lock so a newer keystroke cannot be overwritten
    panel.send_if_modified(|p| {
        if token.is_cancelled() {
            return false;
        }
        p.state = state;
        true
    });
}
