//! Noise filtering applied to the front of each stream.

use std::collections::BTreeSet;

use crate::record::Record;

/// Event types that make it into the feed unless configured otherwise.
pub const DEFAULT_EVENT_WHITELIST: [&str; 2] = ["closed", "reopened"];

/// Decides which records never reach the feed.
///
/// Pull requests are dropped whether they arrive as issues or as the target
/// of an event. Events are dropped unless their type is whitelisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    whitelist: BTreeSet<String>,
}

impl ItemFilter {
    /// Create a filter that keeps only the given event types.
    pub fn new<I, S>(whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            whitelist: whitelist.into_iter().map(Into::into).collect(),
        }
    }

    /// The event types that are kept.
    pub fn whitelist(&self) -> &BTreeSet<String> {
        &self.whitelist
    }

    /// Returns true if `record` must be discarded before merging.
    pub fn must_drop(&self, record: &Record) -> bool {
        if record.is_pull_request() {
            return true;
        }
        record
            .event_type()
            .is_some_and(|kind| !self.whitelist.contains(kind))
    }
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_WHITELIST)
    }
}
