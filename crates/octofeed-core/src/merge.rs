//! Two-way merge of the issues and events streams.
//!
//! Both endpoints return records newest first. The engine repeatedly looks
//! at the front of each stream, discards noise, and takes whichever front
//! record is newer until it has `cap` records or both streams run dry.
//! Pages are fetched only when a stream is drained, never ahead of time.

use tracing::{debug, info, instrument, trace};

use crate::filter::ItemFilter;
use crate::rate_limit::RateLimit;
use crate::record::Record;
use crate::source::{PageOutcome, PageSource, StreamKind};
use crate::traits::Fetcher;
use crate::Result;

/// Number of feed entries produced when no cap is configured.
pub const DEFAULT_CAP: usize = 25;

/// How a merge run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// The first issues page was unchanged since the supplied ETag. Nothing
    /// else was fetched.
    NotModified,

    /// Records in feed order, and the ETag of the first issues page.
    Merged {
        records: Vec<Record>,
        etag: Option<String>,
    },
}

/// Merges one run's issues and events streams.
#[derive(Debug)]
pub struct MergeEngine {
    issues: PageSource,
    events: PageSource,
    filter: ItemFilter,
    cap: usize,
}

impl MergeEngine {
    /// Create an engine over the given endpoints.
    ///
    /// A missing events endpoint yields an engine that merges issues alone.
    pub fn new(issues_endpoint: String, events_endpoint: Option<String>) -> Self {
        Self {
            issues: PageSource::new(StreamKind::Issues, Some(issues_endpoint)),
            events: PageSource::new(StreamKind::Events, events_endpoint),
            filter: ItemFilter::default(),
            cap: DEFAULT_CAP,
        }
    }

    /// Set the maximum number of merged records.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Replace the item filter.
    pub fn with_filter(mut self, filter: ItemFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Run the merge to completion.
    ///
    /// `etag` is sent with the first issues request only, and the ETag of
    /// that response is the one returned. Every response is counted into
    /// `rate_limit`.
    #[instrument(skip(self, fetcher, etag, rate_limit), fields(cap = self.cap))]
    pub async fn run<F>(
        mut self,
        fetcher: &F,
        etag: Option<&str>,
        rate_limit: &mut RateLimit,
    ) -> Result<MergeOutcome>
    where
        F: Fetcher + ?Sized,
    {
        let etag = match self.issues.advance_page(fetcher, etag, rate_limit).await? {
            PageOutcome::NotModified => {
                info!("issues unchanged since supplied ETag");
                return Ok(MergeOutcome::NotModified);
            }
            PageOutcome::Page { etag, .. } => etag,
        };

        self.issues.refill(fetcher, rate_limit).await?;
        self.events.refill(fetcher, rate_limit).await?;

        let mut merged = Vec::new();
        let mut dropped = 0usize;

        while merged.len() < self.cap {
            // after a refill an empty stream has no pages left
            if self.issues.is_empty() && self.events.is_empty() {
                break;
            }

            if self.drop_front(StreamKind::Issues) || self.drop_front(StreamKind::Events) {
                dropped += 1;
            } else if let Some(record) = self.take_newest() {
                merged.push(record);
                if merged.len() == self.cap {
                    break;
                }
            }

            self.issues.refill(fetcher, rate_limit).await?;
            self.events.refill(fetcher, rate_limit).await?;
        }

        info!(merged = merged.len(), dropped, "merge finished");

        Ok(MergeOutcome::Merged {
            records: merged,
            etag,
        })
    }

    fn source_mut(&mut self, kind: StreamKind) -> &mut PageSource {
        match kind {
            StreamKind::Issues => &mut self.issues,
            StreamKind::Events => &mut self.events,
        }
    }

    /// Discard the front record of `kind` if the filter rejects it.
    fn drop_front(&mut self, kind: StreamKind) -> bool {
        let source = match kind {
            StreamKind::Issues => &mut self.issues,
            StreamKind::Events => &mut self.events,
        };
        if !source.front().is_some_and(|record| self.filter.must_drop(record)) {
            return false;
        }
        if let Some(record) = source.pop_front() {
            trace!(stream = %kind, id = record.id(), "dropping record");
        }
        true
    }

    /// Pick the stream whose front record goes next.
    ///
    /// Events win only when strictly newer, so equal timestamps favour the
    /// issue.
    fn next_stream(&self) -> Option<StreamKind> {
        match (self.issues.front(), self.events.front()) {
            (None, None) => None,
            (None, Some(_)) => Some(StreamKind::Events),
            (Some(_), None) => Some(StreamKind::Issues),
            (Some(issue), Some(event)) if event.created_at() > issue.created_at() => {
                Some(StreamKind::Events)
            }
            (Some(_), Some(_)) => Some(StreamKind::Issues),
        }
    }

    fn take_newest(&mut self) -> Option<Record> {
        let kind = self.next_stream()?;
        let record = self.source_mut(kind).pop_front()?;
        debug!(
            stream = %kind,
            id = record.id(),
            created_at = %record.created_at(),
            "taking record"
        );
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{ScriptedFetcher, event, issue, page, pull_request};
    use crate::traits::Response;
    use serde_json::json;

    const ISSUES: &str = "https://api/issues";
    const ISSUES_2: &str = "https://api/issues?page=2";
    const EVENTS: &str = "https://api/events";
    const EVENTS_2: &str = "https://api/events?page=2";

    async fn merge(fetcher: &ScriptedFetcher, events: bool, cap: usize) -> Vec<Record> {
        let events = events.then(|| EVENTS.to_string());
        let engine = MergeEngine::new(ISSUES.into(), events).with_cap(cap);
        let mut rate = RateLimit::default();
        match engine.run(fetcher, None, &mut rate).await.unwrap() {
            MergeOutcome::Merged { records, .. } => records,
            MergeOutcome::NotModified => panic!("unexpected NotModified"),
        }
    }

    fn ids(records: &[Record]) -> Vec<u64> {
        records.iter().map(Record::id).collect()
    }

    #[tokio::test]
    async fn issues_only_when_events_unconfigured() {
        let fetcher = ScriptedFetcher::new().respond(ISSUES, page(&[issue(5, 100)], None));

        let records = merge(&fetcher, false, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![5]);
        assert_eq!(fetcher.requested_urls(), vec![ISSUES.to_string()]);
    }

    #[tokio::test]
    async fn newer_event_goes_first() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[issue(3, 50)], None))
            .respond(EVENTS, page(&[event(9, 80, "closed", issue(3, 50))], None));

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![9, 3]);
        assert!(matches!(records[0], Record::Event(_)));
        assert!(matches!(records[1], Record::Issue(_)));
    }

    #[tokio::test]
    async fn event_with_bare_issue_reference_merges_and_unifies() {
        let mut target = issue(3, 50);
        target["title"] = json!("t");
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[target], None))
            .respond(
                EVENTS,
                page(&[event(9, 80, "closed", json!({"id": 3, "url": "u"}))], None),
            );

        let records = merge(&fetcher, true, DEFAULT_CAP).await;
        let unified = crate::unify::unify(records, "https://github.com/o/r");

        let summary: Vec<_> = unified.iter().map(|i| (i.id, i.state.as_str())).collect();
        assert_eq!(summary, vec![(9, "closed"), (3, "opened")]);
        assert_eq!(unified[0].html_url, "#event-9");
        assert_eq!(unified[1].title, "t");
    }

    #[tokio::test]
    async fn ties_favour_issues() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[issue(1, 50)], None))
            .respond(EVENTS, page(&[event(2, 50, "closed", issue(7, 10))], None));

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[tokio::test]
    async fn interleaves_by_descending_time_across_pages() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[issue(1, 100), issue(2, 70)], Some(ISSUES_2)))
            .respond(ISSUES_2, page(&[issue(3, 40), issue(4, 10)], None))
            .respond(
                EVENTS,
                page(&[event(11, 90, "closed", issue(1, 100))], Some(EVENTS_2)),
            )
            .respond(
                EVENTS_2,
                page(
                    &[
                        event(12, 50, "reopened", issue(1, 100)),
                        event(13, 5, "closed", issue(2, 70)),
                    ],
                    None,
                ),
            );

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![1, 11, 2, 12, 3, 4, 13]);
        for pair in records.windows(2) {
            assert!(pair[0].created_at() >= pair[1].created_at());
        }
    }

    #[tokio::test]
    async fn stops_at_cap_without_fetching_further_pages() {
        let fetcher = ScriptedFetcher::new()
            .respond(
                ISSUES,
                page(&[issue(1, 100), issue(2, 90), issue(3, 80)], Some(ISSUES_2)),
            )
            .respond(ISSUES_2, page(&[issue(4, 70)], None));

        let records = merge(&fetcher, false, 2).await;

        assert_eq!(ids(&records), vec![1, 2]);
        assert_eq!(fetcher.requested_urls(), vec![ISSUES.to_string()]);
    }

    #[tokio::test]
    async fn reaching_cap_skips_pending_refill() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[issue(1, 100), issue(2, 90)], Some(ISSUES_2)))
            .respond(ISSUES_2, Response::new(500, "", [("x", "y")]));

        let records = merge(&fetcher, false, 2).await;

        assert_eq!(ids(&records), vec![1, 2]);
        assert_eq!(fetcher.requested_urls(), vec![ISSUES.to_string()]);
    }

    #[tokio::test]
    async fn cap_zero_yields_nothing() {
        let fetcher = ScriptedFetcher::new().respond(ISSUES, page(&[issue(1, 100)], None));

        let records = merge(&fetcher, false, 0).await;

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn pull_request_event_is_dropped_even_when_newest() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[issue(1, 50)], None))
            .respond(
                EVENTS,
                page(&[event(9, 999, "closed", pull_request(2, 40))], None),
            );

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![1]);
    }

    #[tokio::test]
    async fn drops_noise_from_both_streams() {
        let fetcher = ScriptedFetcher::new()
            .respond(
                ISSUES,
                page(
                    &[pull_request(1, 100), issue(2, 60), pull_request(3, 30)],
                    None,
                ),
            )
            .respond(
                EVENTS,
                page(
                    &[
                        event(10, 90, "labeled", issue(2, 60)),
                        event(11, 80, "closed", issue(2, 60)),
                        event(12, 20, "assigned", issue(2, 60)),
                    ],
                    None,
                ),
            );

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![11, 2]);
    }

    #[tokio::test]
    async fn drained_page_is_refilled_after_a_drop() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[pull_request(1, 100)], Some(ISSUES_2)))
            .respond(ISSUES_2, page(&[issue(2, 60)], None))
            .respond(EVENTS, page(&[event(10, 50, "closed", issue(2, 60))], None));

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert_eq!(ids(&records), vec![2, 10]);
    }

    #[tokio::test]
    async fn terminates_when_everything_is_filtered() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[pull_request(1, 100)], None))
            .respond(
                EVENTS,
                page(&[event(10, 50, "labeled", issue(2, 60))], Some(EVENTS_2)),
            )
            .respond(
                EVENTS_2,
                page(&[event(11, 40, "mentioned", issue(2, 60))], None),
            );

        let records = merge(&fetcher, true, DEFAULT_CAP).await;

        assert!(records.is_empty());
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn not_modified_short_circuits_before_events() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, Response::new(304, "", [("etag", "\"v1\"")]))
            .respond(EVENTS, page(&[event(10, 50, "closed", issue(2, 60))], None));
        let engine = MergeEngine::new(ISSUES.into(), Some(EVENTS.into()));
        let mut rate = RateLimit::default();

        let outcome = engine.run(&fetcher, Some("\"v1\""), &mut rate).await.unwrap();

        assert_eq!(outcome, MergeOutcome::NotModified);
        assert_eq!(
            fetcher.requests(),
            vec![(ISSUES.to_string(), Some("\"v1\"".to_string()))]
        );
    }

    #[tokio::test]
    async fn etag_comes_from_first_issues_page_only() {
        let fetcher = ScriptedFetcher::new()
            .respond(
                ISSUES,
                page(&[issue(1, 100)], Some(ISSUES_2)).with_header("etag", "\"first\""),
            )
            .respond(
                ISSUES_2,
                page(&[issue(2, 90)], None).with_header("etag", "\"second\""),
            )
            .respond(EVENTS, page(&[], None).with_header("etag", "\"events\""));
        let engine = MergeEngine::new(ISSUES.into(), Some(EVENTS.into()));
        let mut rate = RateLimit::default();

        let outcome = engine.run(&fetcher, Some("\"old\""), &mut rate).await.unwrap();

        let MergeOutcome::Merged { records, etag } = outcome else {
            panic!("expected merged records");
        };
        assert_eq!(ids(&records), vec![1, 2]);
        assert_eq!(etag.as_deref(), Some("\"first\""));
        assert_eq!(rate.queries, 3);

        let conditional = fetcher
            .requests()
            .into_iter()
            .filter(|(_, etag)| etag.is_some())
            .count();
        assert_eq!(conditional, 1);
    }

    #[tokio::test]
    async fn upstream_failure_on_later_page_aborts() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[issue(1, 100)], Some(ISSUES_2)))
            .respond(ISSUES_2, Response::new(500, "", [("x", "y")]));
        let engine = MergeEngine::new(ISSUES.into(), None);
        let mut rate = RateLimit::default();

        let err = engine.run(&fetcher, None, &mut rate).await.unwrap_err();

        assert!(matches!(err, Error::Upstream(ref e) if e.status == 500));
    }

    #[tokio::test]
    async fn custom_whitelist_is_honoured() {
        let fetcher = ScriptedFetcher::new()
            .respond(ISSUES, page(&[], None))
            .respond(
                EVENTS,
                page(
                    &[
                        event(10, 90, "labeled", issue(2, 60)),
                        event(11, 80, "closed", issue(2, 60)),
                    ],
                    None,
                ),
            );
        let engine = MergeEngine::new(ISSUES.into(), Some(EVENTS.into()))
            .with_filter(ItemFilter::new(["labeled"]));
        let mut rate = RateLimit::default();

        let MergeOutcome::Merged { records, .. } =
            engine.run(&fetcher, None, &mut rate).await.unwrap()
        else {
            panic!("expected merged records");
        };

        assert_eq!(ids(&records), vec![10]);
    }

    #[tokio::test]
    async fn output_length_is_min_of_cap_and_available() {
        for cap in [0, 1, 3, 5, 10] {
            let fetcher = ScriptedFetcher::new()
                .respond(
                    ISSUES,
                    page(&[issue(1, 100), pull_request(2, 95), issue(3, 80)], None),
                )
                .respond(
                    EVENTS,
                    page(
                        &[
                            event(10, 90, "closed", issue(1, 100)),
                            event(11, 85, "labeled", issue(1, 100)),
                            event(12, 70, "reopened", issue(1, 100)),
                        ],
                        None,
                    ),
                );

            let records = merge(&fetcher, true, cap).await;

            assert_eq!(records.len(), cap.min(4), "cap {cap}");
        }
    }
}
