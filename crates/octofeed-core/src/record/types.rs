//! Issue and issue-event record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A GitHub account as it appears in issue and event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// An issue, either as listed by the issues endpoint or as the output shape
/// of the event unifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,

    /// API URL of the issue; unified events carry the event's API URL here.
    pub url: String,

    /// Browser URL; unified events have `#event-<id>` appended.
    pub html_url: String,

    pub number: u64,

    #[serde(default)]
    pub title: String,

    /// Free-form state such as `open`, `opened`, `closed`, `reopened`.
    #[serde(default)]
    pub state: String,

    /// Author of the issue, or the actor of a unified event. Deleted
    /// accounts come back as `null`.
    #[serde(default)]
    pub user: Option<User>,

    pub created_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,

    /// Present when the "issue" is really a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,

    /// Set only on entries produced from an event that referenced a commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
}

impl Issue {
    /// Returns true if this record is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Returns the author's login, if the account still exists.
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }
}

/// An entry from the repository's issue-events endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub url: String,

    #[serde(default)]
    pub html_url: Option<String>,

    /// Event type, e.g. `closed`, `reopened`, `labeled`.
    pub event: String,

    #[serde(default)]
    pub actor: Option<User>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub commit_id: Option<String>,

    /// The issue this event applies to.
    pub issue: IssueRef,
}

/// The issue an event points at.
///
/// Only `id` and `url` are guaranteed. GitHub usually embeds the full issue,
/// and the fields the feed shows are kept when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: u64,
    pub url: String,

    #[serde(default)]
    pub html_url: String,

    #[serde(default)]
    pub number: u64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl IssueRef {
    /// Returns true if the referenced issue is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// A record pulled from either stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Issue(Issue),
    Event(Box<Event>),
}

impl Record {
    /// Returns the upstream identifier.
    pub fn id(&self) -> u64 {
        match self {
            Record::Issue(issue) => issue.id,
            Record::Event(event) => event.id,
        }
    }

    /// Returns the creation timestamp used for ordering.
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Record::Issue(issue) => issue.created_at,
            Record::Event(event) => event.created_at,
        }
    }

    /// Returns true if the record is, or refers to, a pull request.
    pub fn is_pull_request(&self) -> bool {
        match self {
            Record::Issue(issue) => issue.is_pull_request(),
            Record::Event(event) => event.issue.is_pull_request(),
        }
    }

    /// Returns the event type for event records.
    pub fn event_type(&self) -> Option<&str> {
        match self {
            Record::Issue(_) => None,
            Record::Event(event) => Some(&event.event),
        }
    }
}

impl From<Issue> for Record {
    fn from(issue: Issue) -> Self {
        Record::Issue(issue)
    }
}

impl From<Event> for Record {
    fn from(event: Event) -> Self {
        Record::Event(Box::new(event))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
