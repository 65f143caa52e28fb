//! Validated identifier types.

mod api_url;
mod repo_slug;

pub use api_url::{ApiUrl, GITHUB_API};
pub use repo_slug::RepoSlug;
