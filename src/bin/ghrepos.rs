//! ghrepos CLI binary.
//!
//! Lists a GitHub user's repositories by driving a pagination session.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ghrepos::cli::Cli;
use ghrepos::output::PrettyPrint;
use ghrepos::{FetchOutcome, GitHubClient, PaginationController, Repository, SessionState};
use tabled::{Table, Tabled};
use tokio::sync::broadcast::error::RecvError;

/// Descriptions longer than this are cut in table output.
const DESCRIPTION_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();

    let client = match GitHubClient::new(&cli.api_url, cli.token.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Check --api-url or the GITHUB_API_URL environment variable");
            return ExitCode::FAILURE;
        }
    };

    let state = run(Arc::new(client), &cli).await;
    if let Some(error) = &state.error {
        eprintln!("Error: {error}");
        return ExitCode::FAILURE;
    }

    match output_state(&state, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Search, then keep loading while pages remain and the budget allows.
async fn run(client: Arc<GitHubClient>, cli: &Cli) -> SessionState {
    let controller = PaginationController::with_page_size(client, cli.per_page);

    let mut updates = controller.subscribe();
    let reporter = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(state) => tracing::info!("{}", state.pretty_print()),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "status reporter lagging");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let limit = cli.page_limit();
    let mut loaded = 1;
    let mut outcome = controller.search(&cli.username).await;
    while matches!(outcome, FetchOutcome::Loaded { has_more: true, .. })
        && limit.map_or(true, |limit| loaded < limit)
    {
        outcome = controller.load_more().await;
        loaded += 1;
    }

    let state = controller.snapshot();
    // Closing the channel lets the reporter drain and exit
    drop(controller);
    let _ = reporter.await;
    state
}

fn output_state(state: &SessionState, json: bool) -> ghrepos::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&state.repos)?);
        return Ok(());
    }

    let rows: Vec<RepositoryRow> = state.repos.iter().map(RepositoryRow::from).collect();
    println!("{}", Table::new(rows));

    let last_page = if state.has_more {
        state.current_page - 1
    } else {
        state.current_page
    };
    if state.has_more {
        println!("\nPage {} (more available)", last_page);
    } else {
        println!("\nPage {} (end)", last_page);
    }
    Ok(())
}

// Table row type for non-JSON output

#[derive(Tabled)]
struct RepositoryRow {
    id: u64,
    name: String,
    language: String,
    stars: String,
    description: String,
}

impl From<&Repository> for RepositoryRow {
    fn from(r: &Repository) -> Self {
        let description = r.description_or_empty();
        let description = if description.chars().count() > DESCRIPTION_WIDTH {
            let cut: String = description.chars().take(DESCRIPTION_WIDTH - 1).collect();
            format!("{cut}…")
        } else {
            description.to_string()
        };

        Self {
            id: r.id,
            name: r.name.clone(),
            language: r.language.clone().unwrap_or_default(),
            stars: r
                .stargazers_count
                .map(|s| s.to_string())
                .unwrap_or_default(),
            description,
        }
    }
}
