//! Feed command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::info;

use octofeed_core::FeedOutcome;

use super::SourceArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct FeedArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the document to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: FeedArgs) -> Result<()> {
    let feed = match args.source.fetch().await? {
        FeedOutcome::NotModified { rate_limit } => {
            output::notice("Not modified since the given ETag");
            output::rate_limit(&rate_limit);
            return Ok(());
        }
        FeedOutcome::Updated(feed) => feed,
    };

    let document = feed.to_atom(Utc::now()).render();

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &document)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), entries = feed.entries.len(), "feed written");
            output::notice(&format!(
                "Wrote {} entries to {}",
                feed.entries.len(),
                path.display()
            ));
        }
        None => print!("{}", document),
    }

    if let Some(etag) = &feed.etag {
        output::field("ETag", etag);
    }
    output::rate_limit(&feed.rate_limit);

    Ok(())
}
