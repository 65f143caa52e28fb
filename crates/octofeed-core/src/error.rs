//! Error types for octofeed.
//!
//! A single error enum covers every way a feed run can fail. There is no
//! variant for "not modified": that is a successful outcome of a run and is
//! reported through [`MergeOutcome`](crate::merge::MergeOutcome) instead.

use thiserror::Error;

/// The unified error type for octofeed operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The upstream API answered with neither success nor "not modified".
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// A response body could not be decoded into the expected shape.
    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Input validation errors (repository slug, API URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Wrap a JSON decoding failure for the given URL.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Decode {
            url: url.into(),
            source,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-success response from the upstream API.
#[derive(Debug, Error)]
#[error("HTTP {status} from {url}")]
pub struct UpstreamError {
    /// HTTP status code.
    pub status: u16,
    /// The URL that was requested.
    pub url: String,
}

impl UpstreamError {
    /// Create a new upstream error.
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
        }
    }

    /// Check whether the upstream refused us because the rate limit ran out.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 403 || self.status == 429
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid `owner/name` repository slug.
    #[error("invalid repository '{value}': {reason}")]
    RepoSlug { value: String, reason: String },

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },
}
