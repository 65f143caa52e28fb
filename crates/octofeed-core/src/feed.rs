//! One complete feed run for a repository.
//!
//! Looks up the repository to find its issues and issue-events endpoints,
//! merges the two streams, and unifies the result into issue entries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::atom::AtomFeed;
use crate::config::FeedOptions;
use crate::error::{Error, UpstreamError};
use crate::merge::{MergeEngine, MergeOutcome};
use crate::rate_limit::RateLimit;
use crate::record::{Issue, Repository};
use crate::traits::Fetcher;
use crate::types::RepoSlug;
use crate::unify::unify;
use crate::Result;

/// How a feed run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// Nothing changed since the supplied ETag; the caller should reuse its
    /// previous document.
    NotModified { rate_limit: RateLimit },

    /// A fresh feed.
    Updated(Feed),
}

/// The result of a run that produced entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub repository: Repository,
    pub entries: Vec<Issue>,
    /// ETag to send on the next run.
    pub etag: Option<String>,
    pub rate_limit: RateLimit,
}

impl Feed {
    /// Feed title, e.g. `octom issues`.
    pub fn title(&self) -> String {
        format!("{} issues", self.repository.name)
    }

    /// The repository's issue tracker in the browser.
    pub fn site_url(&self) -> String {
        format!("{}/issues/", self.repository.html_url.trim_end_matches('/'))
    }

    /// Assemble the Atom document; `now` is used only for an empty feed.
    pub fn to_atom(&self, now: DateTime<Utc>) -> AtomFeed {
        AtomFeed::from_issues(self.title(), self.site_url(), &self.entries, now)
    }
}

/// Builds issue feeds through a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct IssueFeed<F> {
    fetcher: F,
    options: FeedOptions,
}

impl<F: Fetcher> IssueFeed<F> {
    /// Create a feed builder.
    pub fn new(fetcher: F, options: FeedOptions) -> Self {
        Self { fetcher, options }
    }

    /// Returns the options in effect.
    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    /// Build the feed for `repo`.
    ///
    /// `etag` is the value returned by the previous run, if any.
    #[instrument(skip(self, repo, etag), fields(repo = %repo))]
    pub async fn fetch(&self, repo: &RepoSlug, etag: Option<&str>) -> Result<FeedOutcome> {
        let mut rate_limit = RateLimit::default();
        let repository = self.repository(repo, &mut rate_limit).await?;

        let issues = repository.issues_endpoint();
        let events = repository.events_endpoint();
        debug!(%issues, events = events.as_deref().unwrap_or("-"), "resolved endpoints");

        let engine = MergeEngine::new(issues, events)
            .with_cap(self.options.cap)
            .with_filter(self.options.filter());

        match engine.run(&self.fetcher, etag, &mut rate_limit).await? {
            MergeOutcome::NotModified => Ok(FeedOutcome::NotModified { rate_limit }),
            MergeOutcome::Merged { records, etag } => {
                let entries = unify(records, &repository.html_url);
                info!(entries = entries.len(), queries = rate_limit.queries, "feed built");
                Ok(FeedOutcome::Updated(Feed {
                    repository,
                    entries,
                    etag,
                    rate_limit,
                }))
            }
        }
    }

    async fn repository(
        &self,
        repo: &RepoSlug,
        rate_limit: &mut RateLimit,
    ) -> Result<Repository> {
        let url = self.options.api_url.repository_url(repo);
        let response = self.fetcher.fetch(&url, None).await?;
        rate_limit.observe(&response);

        if !response.is_success() {
            return Err(UpstreamError::new(response.status, url).into());
        }

        serde_json::from_slice(&response.body).map_err(|e| Error::decode(url, e))
    }
}
