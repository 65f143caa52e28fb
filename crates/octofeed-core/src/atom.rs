//! Atom 1.0 rendering of feed entries.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::record::Issue;

/// Name the generated feeds are attributed to.
pub const GENERATOR_NAME: &str = "octofeed";

/// Homepage the generated feeds link to as their author.
pub const GENERATOR_URL: &str = "https://github.com/octofeed/octofeed";

/// Feed or entry author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomAuthor {
    pub name: String,
    pub url: Option<String>,
}

impl Default for AtomAuthor {
    fn default() -> Self {
        Self {
            name: GENERATOR_NAME.to_string(),
            url: Some(GENERATOR_URL.to_string()),
        }
    }
}

/// One `<entry>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomEntry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub author: Option<String>,
    pub updated: DateTime<Utc>,
    /// HTML content; escaped on output.
    pub content: String,
}

impl From<&Issue> for AtomEntry {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.url.clone(),
            title: format!("Issue {} ({}) {}", issue.number, issue.title, issue.state),
            link: issue.html_url.clone(),
            author: issue.author().map(str::to_string),
            updated: issue.created_at,
            content: issue.body.clone(),
        }
    }
}

/// A complete feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomFeed {
    pub title: String,
    pub site_url: String,
    pub updated: DateTime<Utc>,
    pub author: AtomAuthor,
    pub entries: Vec<AtomEntry>,
}

impl AtomFeed {
    /// Build a feed from unified issues, newest first.
    ///
    /// The feed's `updated` is the first entry's timestamp, or `now` when
    /// there are no entries.
    pub fn from_issues(
        title: impl Into<String>,
        site_url: impl Into<String>,
        issues: &[Issue],
        now: DateTime<Utc>,
    ) -> Self {
        let entries: Vec<AtomEntry> = issues.iter().map(AtomEntry::from).collect();
        let updated = entries.first().map_or(now, |entry| entry.updated);
        Self {
            title: title.into(),
            site_url: site_url.into(),
            updated,
            author: AtomAuthor::default(),
            entries,
        }
    }

    /// Render the document as XML.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AtomFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        writeln!(f, "<feed xmlns=\"http://www.w3.org/2005/Atom\">")?;
        writeln!(f, "  <id>{}</id>", text(&self.site_url))?;
        writeln!(f, "  <title>{}</title>", text(&self.title))?;
        writeln!(f, "  <updated>{}</updated>", timestamp(self.updated))?;
        writeln!(
            f,
            "  <link rel=\"alternate\" type=\"text/html\" href=\"{}\"/>",
            attr(&self.site_url)
        )?;
        writeln!(
            f,
            "  <generator uri=\"{}\">{}</generator>",
            attr(GENERATOR_URL),
            GENERATOR_NAME
        )?;
        writeln!(f, "  <author>")?;
        writeln!(f, "    <name>{}</name>", text(&self.author.name))?;
        if let Some(url) = &self.author.url {
            writeln!(f, "    <uri>{}</uri>", text(url))?;
        }
        writeln!(f, "  </author>")?;

        for entry in &self.entries {
            write!(f, "{entry}")?;
        }

        writeln!(f, "</feed>")
    }
}

impl fmt::Display for AtomEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  <entry>")?;
        writeln!(f, "    <id>{}</id>", text(&self.id))?;
        writeln!(f, "    <title>{}</title>", text(&self.title))?;
        writeln!(
            f,
            "    <link rel=\"alternate\" type=\"text/html\" href=\"{}\"/>",
            attr(&self.link)
        )?;
        writeln!(f, "    <updated>{}</updated>", timestamp(self.updated))?;
        if let Some(author) = &self.author {
            writeln!(f, "    <author><name>{}</name></author>", text(author))?;
        }
        writeln!(
            f,
            "    <content type=\"html\">{}</content>",
            text(&self.content)
        )?;
        writeln!(f, "  </entry>")
    }
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}
