//! OpenAlex metadata fetcher: DOI → work record.

pub mod client;

pub use client::{DEFAULT_BASE_URL, FetchError, OpenAlexClient};
