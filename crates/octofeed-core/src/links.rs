//! `Link` response header parsing.
//!
//! GitHub paginates collections with RFC 8288 style headers:
//!
//! ```text
//! Link: <https://api.github.com/repositories/1/issues?page=2>; rel="next",
//!       <https://api.github.com/repositories/1/issues?page=5>; rel="last"
//! ```

/// Pagination relations found in a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl Links {
    /// Parse a `Link` header value.
    ///
    /// Parts that do not look like `<url>; rel="name"` are skipped, as are
    /// relations other than first/prev/next/last.
    pub fn parse(header: &str) -> Self {
        let mut links = Links::default();

        for part in header.split(',') {
            let mut sections = part.split(';');
            let Some(url) = sections.next().and_then(parse_target) else {
                continue;
            };

            for param in sections {
                let Some(rel) = parse_rel(param) else {
                    continue;
                };
                // rel may hold several space-separated relation types
                for name in rel.split_whitespace() {
                    let slot = match name {
                        "first" => &mut links.first,
                        "prev" | "previous" => &mut links.prev,
                        "next" => &mut links.next,
                        "last" => &mut links.last,
                        _ => continue,
                    };
                    *slot = Some(url.to_string());
                }
            }
        }

        links
    }

    /// Parse an optional header, treating absence as "no links".
    pub fn from_header(header: Option<&str>) -> Self {
        header.map(Self::parse).unwrap_or_default()
    }
}

fn parse_target(section: &str) -> Option<&str> {
    let url = section.trim().strip_prefix('<')?.strip_suffix('>')?.trim();
    (!url.is_empty()).then_some(url)
}

fn parse_rel(param: &str) -> Option<&str> {
    let (key, value) = param.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("rel") {
        return None;
    }
    let value = value.trim();
    Some(
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value),
    )
}
