use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use explorer::screen::{ERROR_TITLE, SearchScreen, View};

mod test_helpers {
    use explorer::client::{SearchOutcome, SearchService};
    use explorer::data_models::{BackendDoc, Suggestion};
    use explorer::error::SearchError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    pub enum Reply {
        /// One backend document per name.
        Docs(Vec<&'static str>),
        Mock,
        Failed,
    }

    /// Search service with a scripted reply and latency per query.
    #[derive(Default)]
    pub struct ScriptedService {
        pub script: HashMap<&'static str, (Duration, Reply)>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        pub fn with(mut self, query: &'static str, latency_ms: u64, reply: Reply) -> Self {
            self.script
                .insert(query, (Duration::from_millis(latency_ms), reply));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SearchService for ScriptedService {
        async fn search(&self, query: &str) -> SearchOutcome {
            self.calls.lock().unwrap().push(query.to_string());
            let Some((latency, reply)) = self.script.get(query) else {
                return SearchOutcome::from_docs(Some(vec![]));
            };
            tokio::time::sleep(*latency).await;
            match reply {
                Reply::Docs(names) => SearchOutcome::from_docs(Some(
                    names
                        .iter()
                        .map(|n| BackendDoc::from_value(&json!({"name": n})))
                        .collect(),
                )),
                Reply::Mock => SearchOutcome::mocked(query, "connection refused".into()),
                Reply::Failed => SearchOutcome::failed("connection refused".into()),
            }
        }

        async fn suggest(&self, _query: &str) -> Result<Vec<Suggestion>, SearchError> {
            Ok(Vec::new())
        }
    }
}

use test_helpers::*;

fn screen(service: ScriptedService) -> (Arc<SearchScreen<ScriptedService>>, Arc<ScriptedService>) {
    let service = Arc::new(service);
    let screen = Arc::new(SearchScreen::new(service.clone(), Duration::from_millis(300)));
    (screen, service)
}

#[tokio::test(start_paused = true)]
async fn test_starts_on_welcome() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default());
    assert_eq!(screen.view(), View::Welcome);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_blank_submit_is_a_no_op() -> Result<()> {
    let (screen, service) = screen(ScriptedService::default());

    screen.submit("").await;
    screen.submit("   \t").await;

    assert!(service.calls().is_empty());
    let state = screen.snapshot();
    assert!(state.query.is_empty());
    assert!(!state.loading);
    assert_eq!(screen.view(), View::Welcome);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_submit_shows_results() -> Result<()> {
    let (screen, service) =
        screen(ScriptedService::default().with("vitamin d3", 10, Reply::Docs(vec!["D3", "D3 Forte", "D3"])));

    screen.submit("  vitamin d3 ").await;

    assert_eq!(service.calls(), vec!["vitamin d3".to_string()]);
    match screen.view() {
        View::Results { query, results } => {
            assert_eq!(query, "vitamin d3");
            assert_eq!(results.len(), 3);
            assert_eq!(results[1].title, "D3 Forte");
        }
        other => panic!("expected results, got {other:?}"),
    }
    assert_eq!(screen.name_suggestions(), vec!["D3".to_string(), "D3 Forte".to_string()]);
    assert!(screen.snapshot().notification.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_zero_matches_shows_no_results() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default());

    screen.submit("unknown").await;

    assert_eq!(
        screen.view(),
        View::NoResults {
            query: "unknown".into()
        }
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_loading_while_in_flight() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default().with("slow", 500, Reply::Docs(vec!["S"])));

    let submitting = tokio::spawn({
        let screen = screen.clone();
        async move { screen.submit("slow").await }
    });
    sleep(Duration::from_millis(100)).await;

    assert!(screen.snapshot().loading);
    assert_eq!(screen.view(), View::Loading);
    assert_eq!(screen.snapshot().query, "slow");

    submitting.await?;
    assert!(!screen.snapshot().loading);
    assert!(matches!(screen.view(), View::Results { .. }));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() -> Result<()> {
    let (screen, _) = screen(
        ScriptedService::default()
            .with("older", 500, Reply::Docs(vec!["Old"]))
            .with("newer", 100, Reply::Docs(vec!["New"])),
    );

    let first = tokio::spawn({
        let screen = screen.clone();
        async move { screen.submit("older").await }
    });
    sleep(Duration::from_millis(10)).await;
    screen.submit("newer").await;

    // older request is still in flight
    assert!(!screen.snapshot().loading);
    first.await?;

    let state = screen.snapshot();
    assert!(!state.loading);
    assert_eq!(state.query, "newer");
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.results[0].title, "New");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_superseded_submit_keeps_loading_until_latest_resolves() -> Result<()> {
    let (screen, _) = screen(
        ScriptedService::default()
            .with("first", 100, Reply::Docs(vec!["First"]))
            .with("second", 500, Reply::Docs(vec!["Second"])),
    );

    let first = tokio::spawn({
        let screen = screen.clone();
        async move { screen.submit("first").await }
    });
    sleep(Duration::from_millis(10)).await;
    let second = tokio::spawn({
        let screen = screen.clone();
        async move { screen.submit("second").await }
    });

    first.await?;
    assert!(screen.snapshot().loading, "first response is stale");

    second.await?;
    let state = screen.snapshot();
    assert!(!state.loading);
    assert_eq!(state.results[0].title, "Second");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_fallback_raises_dismissible_notification() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default().with("aspirin", 10, Reply::Mock));

    screen.submit("aspirin").await;

    let state = screen.snapshot();
    assert!(!state.loading);
    assert_eq!(state.results.len(), 3);
    assert!(state.results.iter().all(|r| r.title.contains("aspirin")));
    assert_eq!(
        state.notification.as_ref().map(|n| n.title.as_str()),
        Some(ERROR_TITLE)
    );

    screen.dismiss_notification();
    assert!(screen.snapshot().notification.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failure_without_fallback_shows_no_results() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default().with("aspirin", 10, Reply::Failed));

    screen.submit("aspirin").await;

    assert_eq!(
        screen.view(),
        View::NoResults {
            query: "aspirin".into()
        }
    );
    assert!(screen.snapshot().notification.is_some());
    assert!(!screen.snapshot().loading);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_keeps_previous_names() -> Result<()> {
    let (screen, _) = screen(
        ScriptedService::default()
            .with("good", 10, Reply::Docs(vec!["Alpha", "Beta"]))
            .with("bad", 10, Reply::Failed),
    );

    screen.submit("good").await;
    screen.submit("bad").await;

    assert_eq!(screen.name_suggestions(), vec!["Alpha".to_string(), "Beta".to_string()]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_successful_search_replaces_names() -> Result<()> {
    let (screen, _) = screen(
        ScriptedService::default()
            .with("one", 10, Reply::Docs(vec!["Alpha"]))
            .with("two", 10, Reply::Docs(vec!["Gamma"])),
    );

    screen.submit("one").await;
    screen.submit("two").await;

    assert_eq!(screen.name_suggestions(), vec!["Gamma".to_string()]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_submit_closes_suggestion_popover() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default());

    screen.on_input("vitamin");
    assert!(screen.suggestions().snapshot().open);

    screen.submit("vitamin").await;
    assert!(!screen.suggestions().snapshot().open);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_successful_search_clears_error_notification() -> Result<()> {
    let (screen, _) = screen(
        ScriptedService::default()
            .with("bad", 10, Reply::Mock)
            .with("good", 10, Reply::Docs(vec!["Good"])),
    );

    screen.submit("bad").await;
    assert!(screen.snapshot().notification.is_some());

    screen.submit("good").await;

    let state = screen.snapshot();
    assert!(state.notification.is_none());
    assert_eq!(state.results[0].title, "Good");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_dropped_submit_clears_loading() -> Result<()> {
    let (screen, _) = screen(ScriptedService::default().with("slow", 10_000, Reply::Docs(vec!["S"])));

    let timed_out = tokio::time::timeout(Duration::from_secs(1), screen.submit("slow")).await;

    assert!(timed_out.is_err());
    assert!(!screen.snapshot().loading);
    assert_eq!(
        screen.view(),
        View::NoResults {
            query: "slow".into()
        }
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_dropped_stale_submit_leaves_latest_loading() -> Result<()> {
    let (screen, _) = screen(
        ScriptedService::default()
            .with("older", 10_000, Reply::Docs(vec!["Old"]))
            .with("newer", 500, Reply::Docs(vec!["New"])),
    );

    let older = tokio::spawn({
        let screen = screen.clone();
        async move { screen.submit("older").await }
    });
    sleep(Duration::from_millis(10)).await;
    let newer = tokio::spawn({
        let screen = screen.clone();
        async move { screen.submit("newer").await }
    });
    sleep(Duration::from_millis(10)).await;

    older.abort();
    let _ = older.await;
    assert!(screen.snapshot().loading, "newer search is still in flight");

    newer.await?;
    let state = screen.snapshot();
    assert!(!state.loading);
    assert_eq!(state.results[0].title, "New");
    Ok(())
}
