//! Repository coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A repository identified as `owner/name`.
///
/// Both halves must be non-empty and may only contain ASCII alphanumerics,
/// `-`, `_` and `.`, which is what GitHub accepts for logins and repository
/// names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Parse an `owner/name` string.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let invalid = |reason: &str| InvalidInputError::RepoSlug {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| invalid("expected 'owner/name'"))?;

        if owner.is_empty() || name.is_empty() {
            return Err(invalid("owner and name must both be present").into());
        }
        if name.contains('/') {
            return Err(invalid("too many path segments").into());
        }
        if !owner.chars().chain(name.chars()).all(is_slug_char) {
            return Err(invalid("contains characters GitHub does not allow").into());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Returns the owning user or organisation.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RepoSlug {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RepoSlug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RepoSlug::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let slug = RepoSlug::new("mkresin/octom").unwrap();
        assert_eq!(slug.owner(), "mkresin");
        assert_eq!(slug.name(), "octom");
        assert_eq!(slug.to_string(), "mkresin/octom");
    }

    #[test]
    fn accepts_dots_and_dashes() {
        assert!(RepoSlug::new("rust-lang/rust.vim").is_ok());
    }

    #[test]
    fn rejects_missing_half() {
        assert!(RepoSlug::new("owner/").is_err());
        assert!(RepoSlug::new("/name").is_err());
        assert!(RepoSlug::new("owner").is_err());
    }

    #[test]
    fn rejects_extra_segments() {
        assert!(RepoSlug::new("owner/name/issues").is_err());
    }

    #[test]
    fn rejects_url_unsafe_characters() {
        assert!(RepoSlug::new("owner/na me").is_err());
        assert!(RepoSlug::new("own?er/name").is_err());
    }
}
