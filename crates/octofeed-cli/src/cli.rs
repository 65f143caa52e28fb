//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::entries::EntriesArgs;
use crate::commands::feed::FeedArgs;

/// Atom feeds of GitHub issue activity.
#[derive(Parser, Debug)]
#[command(name = "octofeed")]
#[command(author, version = env!("OCTOFEED_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Atom feed for a repository
    Feed(FeedArgs),

    /// Print the merged entries as JSON lines
    Entries(EntriesArgs),
}
