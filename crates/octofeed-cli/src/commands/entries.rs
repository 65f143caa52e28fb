//! Entries command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use octofeed_core::FeedOutcome;

use super::SourceArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct EntriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: EntriesArgs) -> Result<()> {
    let feed = match args.source.fetch().await? {
        FeedOutcome::NotModified { rate_limit } => {
            output::notice("Not modified since the given ETag");
            output::rate_limit(&rate_limit);
            return Ok(());
        }
        FeedOutcome::Updated(feed) => feed,
    };

    if feed.entries.is_empty() {
        eprintln!("{}", "No entries found.".dimmed());
    }

    for entry in &feed.entries {
        if args.pretty {
            output::json_pretty(entry)?;
        } else {
            output::json(entry)?;
        }
    }

    if let Some(etag) = &feed.etag {
        output::field("ETag", etag);
    }
    output::rate_limit(&feed.rate_limit);

    Ok(())
}
