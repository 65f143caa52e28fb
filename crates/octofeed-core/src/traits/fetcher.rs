//! Fetcher trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::Result;

/// HTTP 304.
pub const STATUS_NOT_MODIFIED: u16 = 304;

/// A raw upstream response.
///
/// Header names are stored lowercase so lookups do not depend on how the
/// server spelled them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: BTreeMap<String, String>,
}

impl Response {
    /// Create a response, normalising header names to lowercase.
    pub fn new<I, K, V>(status: u16, body: impl Into<Vec<u8>>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            status,
            body: body.into(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the server reported the resource unchanged.
    pub fn is_not_modified(&self) -> bool {
        self.status == STATUS_NOT_MODIFIED
    }
}

/// Something that can perform a conditional GET.
///
/// Implementations must not interpret the status code: a 304 or a 5xx is a
/// normal [`Response`], and only failures to obtain a response at all are
/// errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url`, sending `If-None-Match: etag` when an ETag is given.
    async fn fetch(&self, url: &str, etag: Option<&str>) -> Result<Response>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for &F {
    async fn fetch(&self, url: &str, etag: Option<&str>) -> Result<Response> {
        (**self).fetch(url, etag).await
    }
}
