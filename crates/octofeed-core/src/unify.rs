//! Conversion of merged records into issue-shaped feed entries.

use crate::record::{Event, Issue, Record};

/// Turn an event into the issue entry the feed shows for it.
///
/// The event's identity, actor, type and time replace the issue's. The
/// original issue body is not carried over: events that reference a commit
/// get a link to it, all others an empty body. The commit is assumed to
/// belong to `repo_html_url`, which GitHub does not guarantee.
pub fn unify_event(event: Event, repo_html_url: &str) -> Issue {
    let Event {
        id,
        url,
        html_url: event_html_url,
        event: kind,
        actor,
        created_at,
        commit_id,
        issue,
    } = event;

    let body = match &commit_id {
        Some(sha) => format!(
            "{kind} with commit <a href=\"{}/commit/{sha}\">{sha}</a>",
            repo_html_url.trim_end_matches('/'),
        ),
        None => String::new(),
    };

    // a bare issue reference carries no browser URL
    let base = if issue.html_url.is_empty() {
        event_html_url.unwrap_or_default()
    } else {
        issue.html_url
    };

    Issue {
        id,
        url,
        html_url: format!("{base}#event-{id}"),
        number: issue.number,
        title: issue.title,
        state: kind,
        user: actor,
        created_at,
        body,
        pull_request: issue.pull_request,
        commit_id,
    }
}

/// Put an issue's state into past tense: `open` becomes `opened`.
pub fn normalize_issue(mut issue: Issue) -> Issue {
    if issue.state == "open" {
        issue.state = "opened".to_string();
    }
    issue
}

/// Unify one record.
pub fn unify_record(record: Record, repo_html_url: &str) -> Issue {
    match record {
        Record::Issue(issue) => normalize_issue(issue),
        Record::Event(event) => unify_event(*event, repo_html_url),
    }
}

/// Unify a merged sequence, preserving order.
///
/// Feeding the output back in as issue records yields the same entries:
/// only the literal state `open` is rewritten, and no whitelisted event type
/// is spelled that way.
pub fn unify<I>(records: I, repo_html_url: &str) -> Vec<Issue>
where
    I: IntoIterator<Item = Record>,
{
    records
        .into_iter()
        .map(|record| unify_record(record, repo_html_url))
        .collect()
}
