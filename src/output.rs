//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Repository, SessionPhase, SessionState};

/// Trait for human-readable key-value output.
///
/// Implemented by types the CLI shows when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Repository {
    fn pretty_print(&self) -> String {
        let title = self.full_name.as_deref().unwrap_or(&self.name);
        let divider = "─".repeat(title.chars().count().max(30));

        let mut lines = vec![
            format!("Repository: {}", title),
            divider,
            format!("ID:             {}", self.id),
        ];

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref language) = self.language {
            lines.push(format!("Language:       {}", language));
        }

        if let Some(stars) = self.stargazers_count {
            lines.push(format!("Stars:          {}", stars));
        }

        if self.fork {
            lines.push("Fork:           yes".to_string());
        }

        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", updated.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if let Some(ref url) = self.html_url {
            lines.push(format!("URL:            {}", url));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for SessionState {
    fn pretty_print(&self) -> String {
        let user = self.username.as_deref().unwrap_or("-");
        let status = match self.phase() {
            SessionPhase::Idle => "idle".to_string(),
            SessionPhase::Loading => format!("loading page {}", self.current_page),
            SessionPhase::Success if self.has_more => {
                format!("page {} available", self.current_page)
            }
            SessionPhase::Success => "complete".to_string(),
            SessionPhase::Failed => {
                format!("failed: {}", self.error.as_deref().unwrap_or_default())
            }
        };

        format!("{}: {} repositories ({})", user, self.repos.len(), status)
    }
}
