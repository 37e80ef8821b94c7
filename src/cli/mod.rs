//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the ghrepos binary.

use clap::{ArgAction, Parser};

use crate::client::DEFAULT_API_URL;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// List a GitHub user's repositories, page by page.
#[derive(Parser, Debug)]
#[command(name = "ghrepos", about = "List a GitHub user's repositories", version)]
pub struct Cli {
    /// GitHub username whose repositories to list.
    pub username: String,

    /// Output results as JSON instead of a table.
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Number of repositories per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub per_page: u32,

    /// Maximum number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "all")]
    pub pages: u32,

    /// Keep loading pages until the last one.
    #[arg(long)]
    pub all: bool,

    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Token sent as a bearer credential.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Page budget, `None` meaning unlimited.
    pub fn page_limit(&self) -> Option<u32> {
        if self.all {
            None
        } else {
            Some(self.pages)
        }
    }

    /// Log level implied by `-v` flags.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
