//! octofeed-core - GitHub issue activity as a single feed.
//!
//! Merges a repository's issues and issue events, newest first, into one
//! bounded sequence of issue-shaped entries. HTTP is abstracted behind the
//! [`Fetcher`] trait so the merge can run against any client.
//!
//! # Example
//!
//! ```no_run
//! use octofeed_core::{FeedOptions, FeedOutcome, Fetcher, IssueFeed, RepoSlug};
//!
//! # async fn example(client: impl Fetcher) -> Result<(), octofeed_core::Error> {
//! let feed = IssueFeed::new(client, FeedOptions::default());
//! let repo = RepoSlug::new("mkresin/octom")?;
//!
//! match feed.fetch(&repo, None).await? {
//!     FeedOutcome::Updated(feed) => println!("{}", feed.to_atom(chrono::Utc::now()).render()),
//!     FeedOutcome::NotModified { .. } => println!("unchanged"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod atom;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod links;
pub mod merge;
pub mod rate_limit;
pub mod record;
pub mod source;
pub mod traits;
pub mod types;
pub mod unify;

#[cfg(test)]
mod testing;

pub use atom::{AtomEntry, AtomFeed};
pub use config::FeedOptions;
pub use error::Error;
pub use feed::{Feed, FeedOutcome, IssueFeed};
pub use filter::ItemFilter;
pub use merge::{MergeEngine, MergeOutcome};
pub use rate_limit::RateLimit;
pub use record::{Event, Issue, IssueRef, Record, Repository, User};
pub use source::{PageSource, StreamKind};
pub use traits::{Fetcher, Response};
pub use types::{ApiUrl, RepoSlug};
pub use unify::unify;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
