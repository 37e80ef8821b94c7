//! Basic example demonstrating a pagination session.
//!
//! Run with:
//! ```
//! cargo run --example basic -- octocat
//! ```

use std::sync::Arc;

use ghrepos::output::PrettyPrint;
use ghrepos::{GitHubClient, PaginationController, RepositoryFetcher};

#[tokio::main]
async fn main() -> ghrepos::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let username = std::env::args().nth(1).unwrap_or_else(|| "octocat".to_string());

    // Create client from environment variables
    println!("Creating GitHub client...");
    let client = Arc::new(GitHubClient::from_env()?);
    println!("Connected to: {}", client.base_url());

    // Fetch one page directly
    println!("\n--- First page of {} ---", username);
    let page = client.fetch_page(&username, 1, 5).await?;
    println!(
        "Found {} repositories (more: {}, last page: {:?})",
        page.len(),
        page.has_more,
        page.last_page
    );
    for repo in &page {
        println!("  - {} ({})", repo.name, repo.id);
    }

    // Drive a session, printing every transition
    println!("\n--- Session ---");
    let controller = PaginationController::with_page_size(client, 5);
    let mut updates = controller.subscribe();

    controller.search(&username).await;
    for _ in 0..2 {
        if !controller.snapshot().has_more {
            break;
        }
        controller.load_more().await;
    }

    while let Ok(state) = updates.try_recv() {
        println!("  {}", state.pretty_print());
    }

    if let Some(first) = controller.snapshot().repos.first() {
        println!("\n--- First repository ---");
        println!("{}", first.pretty_print());
    }

    println!("\nDone!");
    Ok(())
}
