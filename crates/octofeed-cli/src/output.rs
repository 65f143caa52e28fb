//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use octofeed_core::RateLimit;

/// Print a notice to stderr.
pub fn notice(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a labeled field to stderr.
pub fn field(label: &str, value: &str) {
    eprintln!("{}: {}", label.dimmed(), value);
}

/// Print the run's rate-limit counters to stderr.
pub fn rate_limit(rate_limit: &RateLimit) {
    for (name, value) in rate_limit.headers() {
        field(name, &value);
    }
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
