use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use explorer::api::create_router;
use explorer::client::SearchClient;
use explorer::config::{CONFIG, Config};
use explorer::render::{render_screen, render_suggestions};
use explorer::screen::SearchScreen;

#[derive(Parser)]
#[command(name = "explorer", about = "Keyword search against a Solr style index")]
struct Cli {
    /// Backend select endpoint, overrides SOLR_URL
    #[arg(long, global = true)]
    solr_url: Option<String>,

    /// Report backend failures instead of showing mock results
    #[arg(long, global = true)]
    no_mock_fallback: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one search and print the result list
    Search { keywords: Vec<String> },
    /// Print live suggestions for a partial input
    Suggest { text: String },
    /// Interactive search prompt
    Repl,
    /// Serve the JSON API for browser frontends
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .init();

    let mut config: Config = CONFIG.clone();
    if let Some(url) = cli.solr_url {
        config.solr_url = url;
    }
    if cli.no_mock_fallback {
        config.mock_fallback = false;
    }

    let client = Arc::new(SearchClient::from_config(&config)?);

    match cli.command {
        Command::Search { keywords } => {
            let screen = SearchScreen::from_config(client, &config);
            screen.submit(&keywords.join(" ")).await;
            println!("{}", render_screen(&screen.snapshot()));
        }
        Command::Suggest { text } => {
            let screen = SearchScreen::from_config(client, &config);
            screen.on_input(&text);
            let panel = wait_for_suggestions(&screen, config.suggest_debounce()).await;
            println!("{}", render_suggestions(&panel));
        }
        Command::Repl => repl(SearchScreen::from_config(client, &config), &config).await?,
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.bind_addr);
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;
            tracing::info!("API listening on {bind}, backend {}", config.solr_url);
            axum::serve(listener, create_router(client)).await?;
        }
    }
    Ok(())
}

async fn wait_for_suggestions(
    screen: &SearchScreen<SearchClient>,
    debounce: Duration,
) -> explorer::suggest::SuggestionPanel {
    use explorer::suggest::SuggestionState;

    let mut rx = screen.suggestions().subscribe();
    tokio::time::sleep(debounce).await;
    let _ = rx
        .wait_for(|p| {
            !matches!(
                p.state,
                SuggestionState::Debouncing | SuggestionState::Loading
            )
        })
        .await;
    screen.suggestions().snapshot()
}

/// `:s <text>` previews suggestions, `:names` lists names from the last
/// search, `:dismiss` clears the error toast, `:q` quits. Anything else is
/// submitted as a search.
async fn repl(screen: SearchScreen<SearchClient>, config: &Config) -> Result<()> {
    println!("{}", render_screen(&screen.snapshot()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            ":q" | ":quit" => break,
            ":names" => println!("{}", screen.name_suggestions().join("\n")),
            ":dismiss" => {
                screen.dismiss_notification();
                println!("{}", render_screen(&screen.snapshot()));
            }
            _ => {
                if let Some(text) = line.strip_prefix(":s ") {
                    screen.on_input(text);
                    let panel = wait_for_suggestions(&screen, config.suggest_debounce()).await;
                    println!("{}", render_suggestions(&panel));
                } else {
                    screen.submit(line).await;
                    println!("{}", render_screen(&screen.snapshot()));
                }
            }
        }
    }
    Ok(())
}
