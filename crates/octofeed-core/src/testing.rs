//! Test helpers: a scripted fetcher and JSON fixture builders.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{Value, json};

use crate::Result;
use crate::traits::{Fetcher, Response};

/// Serves queued responses per URL and records every request.
///
/// The last response queued for a URL is replayed if it is requested again;
/// unknown URLs get a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, VecDeque<Response>>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, response: Response) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|(url, _)| url).collect()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, etag: Option<&str>) -> Result<Response> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), etag.map(str::to_string)));

        let mut responses = self.responses.lock().unwrap();
        let response = match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| Response::new(404, "{}", [("x-scripted", "miss")])))
    }
}

fn timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .expect("timestamp in range")
        .to_rfc3339()
}

/// An open issue created at `created` seconds past the epoch.
pub fn issue(id: u64, created: i64) -> Value {
    json!({
        "id": id,
        "url": format!("https://api.github.com/repos/o/r/issues/{id}"),
        "html_url": format!("https://github.com/o/r/issues/{id}"),
        "number": id,
        "title": format!("issue {id}"),
        "state": "open",
        "user": {"login": "author"},
        "created_at": timestamp(created),
        "body": format!("body of {id}")
    })
}

/// A pull request listed by the issues endpoint.
pub fn pull_request(id: u64, created: i64) -> Value {
    let mut value = issue(id, created);
    value["pull_request"] = json!({"url": format!("https://api.github.com/repos/o/r/pulls/{id}")});
    value
}

/// An issue event of type `kind` on `target`.
pub fn event(id: u64, created: i64, kind: &str, target: Value) -> Value {
    json!({
        "id": id,
        "url": format!("https://api.github.com/repos/o/r/issues/events/{id}"),
        "event": kind,
        "actor": {"login": "actor"},
        "commit_id": null,
        "created_at": timestamp(created),
        "issue": target
    })
}

/// A 200 response holding `records`, linking to `next` when given.
pub fn page(records: &[Value], next: Option<&str>) -> Response {
    let body = serde_json::to_vec(records).expect("fixtures serialize");
    let response = Response::new(200, body, [("content-type", "application/json")]);
    match next {
        Some(url) => response.with_header("link", format!("<{url}>; rel=\"next\"")),
        None => response,
    }
}
