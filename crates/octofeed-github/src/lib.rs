//! octofeed-github - GitHub REST client for octofeed.

mod client;

pub use client::GitHubClient;

use octofeed_core::{FeedOptions, IssueFeed, Result};

/// Build an [`IssueFeed`] backed by a [`GitHubClient`].
pub fn issue_feed(
    options: FeedOptions,
    token: Option<String>,
) -> Result<IssueFeed<GitHubClient>> {
    Ok(IssueFeed::new(GitHubClient::new(token)?, options))
}
