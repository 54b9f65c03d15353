use chrono::{Datelike, Local};
use std::fmt::Write;

use crate::screen::{Notification, ScreenState, View};
use crate::suggest::{SuggestionPanel, SuggestionState};

pub const HEADER: &str = "Web Explorer";
pub const WELCOME: &str = "Search the web to find what you're looking for";
pub const NO_RESULTS: &str = "No results found";
pub const NO_RESULTS_HINT: &str = "Try another search term";
pub const LOADING: &str = "Searching...";

pub fn render_view(view: &View) -> String {
    let mut out = String::new();
    match view {
        View::Loading => out.push_str(LOADING),
        View::Welcome => out.push_str(WELCOME),
        View::NoResults { .. } => {
            let _ = write!(out, "{NO_RESULTS}\n{NO_RESULTS_HINT}");
        }
        View::Results { results, .. } => {
            let _ = writeln!(out, "{} Search Results", results.len());
            for result in results {
                let _ = write!(
                    out,
                    "\n{}\n  {}\n  {}\n",
                    result.title, result.url, result.snippet
                );
            }
        }
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    format!("[!] {}: {}", notification.title, notification.description)
}

/// Empty when the popover is closed.
pub fn render_suggestions(panel: &SuggestionPanel) -> String {
    if !panel.open {
        return String::new();
    }
    match &panel.state {
        SuggestionState::Idle => String::new(),
        SuggestionState::Debouncing | SuggestionState::Loading => "  ...".to_string(),
        SuggestionState::Empty => "  (no suggestions)".to_string(),
        SuggestionState::Populated(items) => items
            .iter()
            .enumerate()
            .map(|(i, s)| format!("  {}. {} - {}", i + 1, s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn footer() -> String {
    format!("© {} Web Explorer Search", Local::now().year())
}

/// Full page: header, optional toast, result area and footer.
pub fn render_screen(state: &ScreenState) -> String {
    let mut sections = vec![HEADER.to_string()];
    if let Some(notification) = &state.notification {
        sections.push(render_notification(notification));
    }
    sections.push(render_view(&state.view()));
    sections.push(footer());
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::{SearchResult, Suggestion};

    #[test]
    fn test_render_results_lists_every_card() {
        let view = View::Results {
            query: "x".into(),
            results: vec![
                SearchResult::new("A".into(), "https://a".into(), "first".into()),
                SearchResult::new("B".into(), "#".into(), "second".into()),
            ],
        };
        let text = render_view(&view);
        assert!(text.starts_with("2 Search Results"));
        assert!(text.contains("https://a"));
        assert!(text.contains("second"));
    }

    #[test]
    fn test_render_no_results() {
        let text = render_view(&View::NoResults { query: "x".into() });
        assert!(text.contains(NO_RESULTS));
        assert!(text.contains(NO_RESULTS_HINT));
    }

    #[test]
    fn test_closed_popover_renders_nothing() {
        let panel = SuggestionPanel {
            query: "ab".into(),
            state: SuggestionState::Populated(vec![Suggestion {
                name: "n".into(),
                description: "d".into(),
            }]),
            open: false,
        };
        assert!(render_suggestions(&panel).is_empty());
    }

    #[test]
    fn test_screen_shows_toast_and_footer() {
        let state = ScreenState {
            query: "x".into(),
            notification: Some(Notification {
                title: "Search Error".into(),
                description: "oops".into(),
            }),
            ..Default::default()
        };
        let text = render_screen(&state);
        assert!(text.starts_with(HEADER));
        assert!(text.contains("[!] Search Error: oops"));
        assert!(text.contains(NO_RESULTS));
        assert!(text.ends_with("Web Explorer Search"));
    }
}
