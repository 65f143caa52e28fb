//! Rate-limit telemetry.
//!
//! Counters are reported back to the caller untouched; nothing in the
//! merge logic looks at them.

use serde::{Deserialize, Serialize};

use crate::traits::Response;

/// Upstream quota as last reported, plus how many requests this run made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub queries: u32,
    pub limit: Option<String>,
    /// Servers omit this header once the quota is used up.
    pub remaining: Option<String>,
    pub reset: Option<String>,
}

impl RateLimit {
    /// Record one response.
    pub fn observe(&mut self, response: &Response) {
        self.queries += 1;
        self.limit = response.header("x-ratelimit-limit").map(str::to_string);
        self.remaining = response.header("x-ratelimit-remaining").map(str::to_string);
        self.reset = response.header("x-ratelimit-reset").map(str::to_string);
    }

    /// The counters as response headers, for callers that proxy them.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("X-Number-Queries", self.queries.to_string())];
        let optional = [
            ("X-RateLimit-Limit", &self.limit),
            ("X-RateLimit-Remaining", &self.remaining),
            ("X-RateLimit-Reset", &self.reset),
        ];
        headers.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.clone().map(|v| (name, v))),
        );
        headers
    }
}
