//! Run configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::filter::{DEFAULT_EVENT_WHITELIST, ItemFilter};
use crate::merge::DEFAULT_CAP;
use crate::types::ApiUrl;

/// Settings for building one repository's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedOptions {
    /// Base URL of the GitHub-compatible API.
    pub api_url: ApiUrl,

    /// Maximum number of entries.
    pub cap: usize,

    /// Event types included in the feed.
    pub event_whitelist: BTreeSet<String>,
}

impl FeedOptions {
    /// The filter these options describe.
    pub fn filter(&self) -> ItemFilter {
        ItemFilter::new(self.event_whitelist.iter().cloned())
    }
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            api_url: ApiUrl::default(),
            cap: DEFAULT_CAP,
            event_whitelist: DEFAULT_EVENT_WHITELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
