//! Subcommand implementations.

pub mod entries;
pub mod feed;

use anyhow::{Context, Result};
use clap::Args;

use octofeed_core::{ApiUrl, FeedOptions, FeedOutcome, RepoSlug};

/// Arguments shared by every command that runs a feed.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Repository as owner/name
    pub repo: RepoSlug,

    /// GitHub personal access token
    #[arg(long, env = "OCTOFEED_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// ETag from a previous run
    #[arg(long)]
    pub etag: Option<String>,

    /// Maximum number of entries
    #[arg(long, default_value_t = octofeed_core::merge::DEFAULT_CAP)]
    pub limit: usize,

    /// Event type to include (repeatable; defaults to closed and reopened)
    #[arg(long)]
    pub event: Vec<String>,

    /// Base URL of the GitHub API
    #[arg(long, env = "OCTOFEED_API_URL", default_value = "https://api.github.com")]
    pub api_url: ApiUrl,
}

impl SourceArgs {
    fn options(&self) -> FeedOptions {
        let mut options = FeedOptions {
            api_url: self.api_url.clone(),
            cap: self.limit,
            ..FeedOptions::default()
        };
        if !self.event.is_empty() {
            options.event_whitelist = self.event.iter().cloned().collect();
        }
        options
    }

    /// Run the feed against GitHub.
    pub async fn fetch(&self) -> Result<FeedOutcome> {
        let feed = octofeed_github::issue_feed(self.options(), self.token.clone())
            .context("Failed to create GitHub client")?;

        feed.fetch(&self.repo, self.etag.as_deref())
            .await
            .with_context(|| format!("Failed to build feed for {}", self.repo))
    }
}
