//! GitHub HTTP client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, IF_NONE_MATCH};
use tracing::{debug, instrument, trace};

use octofeed_core::error::{Error, TransportError};
use octofeed_core::traits::{Fetcher, Response};
use octofeed_core::Result;

/// Media type for the GitHub REST API.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// HTTP client for the GitHub REST API.
///
/// Returns every response as-is, including 304 and error statuses; only
/// failures to get a response at all become errors.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client, optionally authenticated with a personal access
    /// token. Unauthenticated clients get a much lower rate limit.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("octofeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self::with_client(client, token))
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client, token: Option<String>) -> Self {
        let token = token.filter(|t| !t.is_empty());
        Self { client, token }
    }

    /// Returns true if requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[async_trait]
impl Fetcher for GitHubClient {
    #[instrument(skip(self, etag), fields(conditional = etag.is_some()))]
    async fn fetch(&self, url: &str, etag: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        debug!(status, "GitHub response");

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        trace!(?headers, "response headers");

        let body = response.bytes().await.map_err(transport_error)?;

        Ok(Response::new(status, body.to_vec(), headers))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}
