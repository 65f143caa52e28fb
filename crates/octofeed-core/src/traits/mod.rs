//! Core traits for talking to the upstream API.

mod fetcher;

pub use fetcher::{Fetcher, Response, STATUS_NOT_MODIFIED};
