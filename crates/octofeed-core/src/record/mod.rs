//! Record types decoded from the issues and issue-events endpoints.
//!
//! Both endpoints decode into the [`Record`] tagged union so the merge
//! engine can order them by their shared `created_at`. After unification
//! every entry is an [`Issue`].

mod repository;
mod types;

pub use repository::Repository;
pub use types::{Event, Issue, IssueRef, Record, User};
