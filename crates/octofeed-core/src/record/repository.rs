//! Repository metadata used to discover the feed's endpoints.

use serde::{Deserialize, Serialize};

/// Placeholder GitHub appends to per-item URL templates.
const NUMBER_TEMPLATE: &str = "{/number}";

/// The subset of `GET /repos/{owner}/{repo}` the feed needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,

    #[serde(default)]
    pub full_name: String,

    pub html_url: String,

    /// Issues URL template, e.g. `.../issues{/number}`.
    pub issues_url: String,

    /// Issue-events URL template. Absent on some GitHub-compatible servers.
    #[serde(default)]
    pub issue_events_url: Option<String>,
}

impl Repository {
    /// The collection URL for the repository's issues.
    pub fn issues_endpoint(&self) -> String {
        self.issues_url.replace(NUMBER_TEMPLATE, "")
    }

    /// The collection URL for the repository's issue events, if any.
    pub fn events_endpoint(&self) -> Option<String> {
        self.issue_events_url
            .as_deref()
            .map(|url| url.replace(NUMBER_TEMPLATE, ""))
    }
}
