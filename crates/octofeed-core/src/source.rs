//! Paginated record sources.
//!
//! A [`PageSource`] owns one endpoint's pagination cursor and the records
//! fetched from it that have not been consumed yet. Records leave the batch
//! from the front only; there is no rewind.

use std::collections::VecDeque;
use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{Error, UpstreamError};
use crate::links::Links;
use crate::rate_limit::RateLimit;
use crate::record::{Event, Issue, Record};
use crate::traits::{Fetcher, Response, STATUS_NOT_MODIFIED};
use crate::Result;

/// Which endpoint a source reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Issues,
    Events,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Issues => f.write_str("issues"),
            StreamKind::Events => f.write_str("events"),
        }
    }
}

/// Where the next page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    Pending(String),
    Exhausted,
}

/// Result of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A page was fetched and its records appended to the batch.
    Page {
        /// The response ETag; only reported for the issues stream.
        etag: Option<String>,
        /// Number of records the page contained.
        fetched: usize,
    },

    /// The server answered 304 to a conditional request.
    NotModified,
}

/// One paginated stream of records.
#[derive(Debug, Clone)]
pub struct PageSource {
    kind: StreamKind,
    cursor: Cursor,
    batch: VecDeque<Record>,
}

impl PageSource {
    /// Create a source starting at `endpoint`.
    ///
    /// `None` means the repository does not expose this endpoint; the source
    /// then behaves as permanently empty.
    pub fn new(kind: StreamKind, endpoint: Option<String>) -> Self {
        let cursor = match endpoint {
            Some(url) => Cursor::Pending(url),
            None => Cursor::Exhausted,
        };
        Self {
            kind,
            cursor,
            batch: VecDeque::new(),
        }
    }

    /// Records fetched so far and not yet consumed.
    pub fn current_batch(&self) -> &VecDeque<Record> {
        &self.batch
    }

    /// The next record to be consumed.
    pub fn front(&self) -> Option<&Record> {
        self.batch.front()
    }

    /// Consume the next record.
    pub fn pop_front(&mut self) -> Option<Record> {
        self.batch.pop_front()
    }

    /// Returns true if no fetched records remain.
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Returns true if another page can still be fetched.
    pub fn has_next_page(&self) -> bool {
        matches!(self.cursor, Cursor::Pending(_))
    }

    /// Returns true once the batch is empty and no page remains.
    pub fn is_drained(&self) -> bool {
        self.is_empty() && !self.has_next_page()
    }

    /// Fetch one page from the cursor and append its records.
    ///
    /// An exhausted source returns an empty page without fetching. A 304 is
    /// reported as [`PageOutcome::NotModified`] and leaves the cursor where it
    /// was; any other non-success status is an [`UpstreamError`].
    #[instrument(skip(self, fetcher, etag, rate_limit), fields(stream = %self.kind))]
    pub async fn advance_page<F>(
        &mut self,
        fetcher: &F,
        etag: Option<&str>,
        rate_limit: &mut RateLimit,
    ) -> Result<PageOutcome>
    where
        F: Fetcher + ?Sized,
    {
        let Cursor::Pending(url) = &self.cursor else {
            return Ok(PageOutcome::Page {
                etag: None,
                fetched: 0,
            });
        };
        let url = url.clone();

        let response = fetcher.fetch(&url, etag).await?;
        rate_limit.observe(&response);
        debug!(%url, status = response.status, "fetched page");

        if response.is_not_modified() {
            return Ok(PageOutcome::NotModified);
        }
        if !response.is_success() {
            return Err(UpstreamError::new(response.status, url).into());
        }

        let records = self.decode(&url, &response)?;
        let fetched = records.len();

        self.cursor = match Links::from_header(response.header("link")).next {
            Some(next) => Cursor::Pending(next),
            None => Cursor::Exhausted,
        };
        self.batch.extend(records);

        debug!(fetched, more = self.has_next_page(), "page decoded");

        let etag = match self.kind {
            StreamKind::Issues => response.header("etag").map(str::to_string),
            StreamKind::Events => None,
        };

        Ok(PageOutcome::Page { etag, fetched })
    }

    /// Fetch pages until the batch is non-empty or the cursor runs out.
    ///
    /// Returns the number of pages fetched. No ETag is sent, so a 304 here
    /// is an upstream error rather than a short-circuit.
    pub async fn refill<F>(&mut self, fetcher: &F, rate_limit: &mut RateLimit) -> Result<usize>
    where
        F: Fetcher + ?Sized,
    {
        let mut pages = 0;
        while self.is_empty() && self.has_next_page() {
            let url = match &self.cursor {
                Cursor::Pending(url) => url.clone(),
                Cursor::Exhausted => break,
            };
            if let PageOutcome::NotModified = self.advance_page(fetcher, None, rate_limit).await? {
                return Err(UpstreamError::new(STATUS_NOT_MODIFIED, url).into());
            }
            pages += 1;
        }
        Ok(pages)
    }

    fn decode(&self, url: &str, response: &Response) -> Result<Vec<Record>> {
        match self.kind {
            StreamKind::Issues => Ok(decode_page::<Issue>(url, response)?
                .into_iter()
                .map(Record::from)
                .collect()),
            StreamKind::Events => Ok(decode_page::<Event>(url, response)?
                .into_iter()
                .map(Record::from)
                .collect()),
        }
    }
}

fn decode_page<T: DeserializeOwned>(url: &str, response: &Response) -> Result<Vec<T>> {
    serde_json::from_slice(&response.body).map_err(|e| Error::decode(url, e))
}
